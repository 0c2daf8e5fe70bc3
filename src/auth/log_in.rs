//! This file defines the route for handling log-in requests.
//! The cookie module handles the lower level cookie auth logic.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::{Email, REMEMBER_ME_COOKIE_DURATION, User, get_user_by_email, set_auth_cookie},
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials sent with a log-in request.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// The email the user registered with.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
    /// Keep the user logged in for a week instead of an hour.
    #[serde(default)]
    pub remember_me: bool,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the user is
/// returned.
///
/// # Errors
///
/// Returns an [Error::InvalidCredentials] if the email is unknown or the
/// password is wrong. Both cases give the same error so that clients cannot
/// tell which emails are registered.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Json(user_data): Json<LogInData>,
) -> Result<(PrivateCookieJar, Json<User>), Error> {
    let email = Email::new(&user_data.email).map_err(|_| Error::InvalidCredentials)?;

    let user = {
        let connection = lock_connection(&state.db_connection)?;

        match get_user_by_email(&email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                tracing::debug!("Log in attempted with unregistered email");
                return Err(Error::InvalidCredentials);
            }
            Err(error) => return Err(error),
        }
    };

    if !user.password_hash.verify(&user_data.password)? {
        tracing::debug!("Log in attempted with wrong password for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let cookie_duration = if user_data.remember_me {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let jar = set_auth_cookie(jar, user.id, cookie_duration)?;

    Ok((jar, Json(user)))
}

#[cfg(test)]
mod log_in_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, REMEMBER_ME_COOKIE_DURATION},
        build_router, endpoints,
        test_utils::{TEST_PASSWORD, assert_error_code, create_test_user, get_test_app_state},
    };

    fn get_test_server() -> TestServer {
        let state = get_test_app_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_test_user(&connection);
        }

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(5),
            "got date time {:?}, want {:?}",
            left,
            right
        );
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = get_test_server();

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": " Budi@Example.com ",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["email"], "budi@example.com");
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION,
        );
    }

    #[tokio::test]
    async fn remember_me_extends_cookie() {
        let server = get_test_server();

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "budi@example.com",
                "password": TEST_PASSWORD,
                "remember_me": true,
            }))
            .await;

        response.assert_status_ok();
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + REMEMBER_ME_COOKIE_DURATION,
        );
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = get_test_server();

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "budi@example.com",
                "password": "wrongpassword",
            }))
            .await;

        assert_error_code(&response, StatusCode::UNAUTHORIZED, "invalid_credentials");
        assert!(response.maybe_cookie(COOKIE_TOKEN).is_none());
    }

    #[tokio::test]
    async fn unknown_email_looks_like_wrong_password() {
        let server = get_test_server();

        let unknown_email = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "nobody@example.com",
                "password": TEST_PASSWORD,
            }))
            .await;
        let wrong_password = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "budi@example.com",
                "password": "wrongpassword",
            }))
            .await;

        assert_eq!(unknown_email.status_code(), wrong_password.status_code());
        assert_eq!(unknown_email.text(), wrong_password.text());
    }
}

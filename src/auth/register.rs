//! Defines the endpoint for registering a new user.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::{Email, PasswordHash, User, ValidatedPassword, create_user, set_auth_cookie},
    name::Name,
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The bcrypt cost for hashing the new password.
    pub password_hash_cost: u32,
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The data for registering a new user.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterForm {
    /// The name the user goes by.
    pub name: String,
    /// The email address the user will log in with.
    pub email: String,
    /// The user's chosen password.
    pub password: String,
    /// The password typed a second time.
    pub confirm_password: String,
}

/// A route handler for creating a new user.
///
/// On success the user is logged in and the new user is returned with a
/// 201 status.
///
/// # Errors
///
/// Returns an error if the name or email is invalid, the passwords do not
/// match, the password is too weak, or the email is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, PrivateCookieJar, Json<User>), Error> {
    let name = Name::new(&form.name)?;
    let email = Email::new(&form.email)?;

    if form.password != form.confirm_password {
        return Err(Error::PasswordMismatch);
    }

    let password = ValidatedPassword::new(&form.password, &[name.as_ref(), email.as_ref()])?;
    let password_hash = PasswordHash::new(password, state.password_hash_cost)?;

    let user = create_user(
        name,
        email,
        password_hash,
        OffsetDateTime::now_utc(),
        &*lock_connection(&state.db_connection)?,
    )?;

    tracing::info!("Registered user {}", user.id);

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((StatusCode::CREATED, jar, Json(user)))
}

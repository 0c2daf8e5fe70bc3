use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use serde_json::{Value, json};

use crate::{
    AppState, User, build_router,
    auth::COOKIE_TOKEN,
    endpoints,
    test_utils::{TEST_PASSWORD, create_test_user},
};

use super::get_test_app_state;

/// A test server for the full router with the test user logged in.
pub(crate) struct LoggedInServer {
    pub server: TestServer,
    pub state: AppState,
    pub user: User,
}

pub(crate) async fn logged_in_server() -> LoggedInServer {
    let state = get_test_app_state();
    let user = {
        let connection = state.db_connection.lock().unwrap();
        create_test_user(&connection)
    };

    let mut server =
        TestServer::new(build_router(state.clone())).expect("Could not create test server.");
    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({
            "email": user.email,
            "password": TEST_PASSWORD,
        }))
        .await;
    response.assert_status_ok();
    server.add_cookie(response.cookie(COOKIE_TOKEN));

    LoggedInServer {
        server,
        state,
        user,
    }
}

#[track_caller]
pub(crate) fn assert_content_type(response: &TestResponse, content_type: &str) {
    assert_eq!(response.header("content-type"), content_type);
}

#[track_caller]
pub(crate) fn assert_error_code(response: &TestResponse, status: StatusCode, code: &str) {
    response.assert_status(status);
    let body: Value = response.json();
    assert_eq!(
        body["error"]["code"], code,
        "want error code {code}, got body {body}"
    );
}

#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod http;

pub(crate) use db::{TEST_PASSWORD, create_test_user, get_test_app_state, get_test_connection};
pub(crate) use http::{LoggedInServer, assert_content_type, assert_error_code, logged_in_server};

//! Uangku is a web service for tracking personal finances.
//!
//! Users keep track of their wallets, record income and expenses against
//! categories, set budgets and savings goals, and get reminded about upcoming
//! bills. Everything is served as JSON from a REST API under `/api`.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod app_state;
mod auth;
mod bill;
mod budget;
mod category;
mod currency;
mod database_id;
mod date_range;
mod db;
mod demo;
mod endpoints;
mod goal;
mod insights;
mod logging;
mod name;
mod pagination;
mod routing;
mod text_enum;
mod timezone;
mod transaction;
mod wallet;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    Email, PasswordHash, User, UserID, ValidatedPassword, create_user, get_user_by_email,
    update_password,
};
pub use db::{initialize as initialize_db, schema_version};
pub use demo::populate_demo_data;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use name::Name;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use timezone::local_today;

use crate::{category::TransactionKind, database_id::DatabaseId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password combination did not match a registered user.
    #[error("incorrect email or password")]
    InvalidCredentials,

    /// The request did not carry a valid, unexpired auth token.
    #[error("you must be logged in to access this resource")]
    Unauthorized,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The password and its confirmation did not match.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// A user with the email address is already registered.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// An empty string was used where a name is required.
    #[error("name cannot be empty")]
    EmptyName,

    /// A name was longer than the allowed number of characters.
    #[error("name cannot be longer than {0} characters")]
    NameTooLong(usize),

    /// The user already has a wallet with this name.
    #[error("the wallet \"{0}\" already exists")]
    DuplicateWalletName(String),

    /// The user already has a category with this name and kind.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// An amount that must be greater than zero was not.
    #[error("amount must be a number greater than zero, got {0}")]
    NonPositiveAmount(f64),

    /// An amount that must not be negative was.
    #[error("amount cannot be negative, got {0}")]
    NegativeAmount(f64),

    /// The wallet ID does not refer to a wallet owned by the user.
    #[error("the wallet ID {0} does not refer to a valid wallet")]
    InvalidWallet(DatabaseId),

    /// The category ID does not refer to a category owned by the user.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(DatabaseId),

    /// The category's kind does not fit where it was used, e.g. an income
    /// category on an expense.
    #[error("expected a category for {expected}, got a category for {actual}")]
    CategoryKindMismatch {
        /// The kind of category that was required.
        expected: TransactionKind,
        /// The kind of the category that was given.
        actual: TransactionKind,
    },

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// The start of a date range is after its end.
    #[error("the date range {0} to {1} is invalid, the start must not be after the end")]
    InvalidDateRange(Date, Date),

    /// A date is too close to the end of the calendar for the next week,
    /// month or year after it to exist.
    #[error("{0} is too far in the future to work out the period after it")]
    DateOutOfRange(Date),

    /// The number of reminder days for a bill is out of range.
    #[error("reminder days must be between 0 and {max}, got {got}")]
    InvalidReminderDays {
        /// The value that was given.
        got: u32,
        /// The largest accepted value.
        max: u32,
    },

    /// A goal contribution of zero was requested.
    #[error("a contribution cannot be zero")]
    ZeroContribution,

    /// A withdrawal would take a goal's saved amount below zero.
    #[error("cannot withdraw {requested}, only {available} has been saved")]
    InsufficientGoalFunds {
        /// The amount the user tried to withdraw.
        requested: f64,
        /// The amount saved towards the goal.
        available: f64,
    },

    /// A one-off bill that has already been paid was paid again.
    #[error("the bill has already been paid")]
    BillAlreadyPaid,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    /// Resources owned by another user are also reported as not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The auth token could not be serialized or its expiry could not be computed.
    #[error("could not create the auth token: {0}")]
    TokenError(String),

    /// Transactions could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::TooWeak(_)
            | Error::PasswordMismatch
            | Error::InvalidEmail(_)
            | Error::EmptyName
            | Error::NameTooLong(_)
            | Error::NonPositiveAmount(_)
            | Error::NegativeAmount(_)
            | Error::InvalidWallet(_)
            | Error::InvalidCategory(_)
            | Error::CategoryKindMismatch { .. }
            | Error::FutureDate(_)
            | Error::InvalidDateRange(_, _)
            | Error::DateOutOfRange(_)
            | Error::InvalidReminderDays { .. }
            | Error::ZeroContribution
            | Error::InsufficientGoalFunds { .. } => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail
            | Error::DuplicateWalletName(_)
            | Error::DuplicateCategoryName(_)
            | Error::BillAlreadyPaid => StatusCode::CONFLICT,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::InvalidTimezoneError(_)
            | Error::DatabaseLockError
            | Error::TokenError(_)
            | Error::CsvError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// A short machine readable code that clients can match on.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidCredentials => "invalid_credentials",
            Error::Unauthorized => "unauthorized",
            Error::TooWeak(_) => "password_too_weak",
            Error::PasswordMismatch => "password_mismatch",
            Error::InvalidEmail(_) => "invalid_email",
            Error::DuplicateEmail => "duplicate_email",
            Error::EmptyName => "empty_name",
            Error::NameTooLong(_) => "name_too_long",
            Error::DuplicateWalletName(_) => "duplicate_wallet_name",
            Error::DuplicateCategoryName(_) => "duplicate_category_name",
            Error::NonPositiveAmount(_) => "non_positive_amount",
            Error::NegativeAmount(_) => "negative_amount",
            Error::InvalidWallet(_) => "invalid_wallet",
            Error::InvalidCategory(_) => "invalid_category",
            Error::CategoryKindMismatch { .. } => "category_kind_mismatch",
            Error::FutureDate(_) => "future_date",
            Error::InvalidDateRange(_, _) => "invalid_date_range",
            Error::DateOutOfRange(_) => "date_out_of_range",
            Error::InvalidReminderDays { .. } => "invalid_reminder_days",
            Error::ZeroContribution => "zero_contribution",
            Error::InsufficientGoalFunds { .. } => "insufficient_goal_funds",
            Error::BillAlreadyPaid => "bill_already_paid",
            Error::NotFound => "not_found",
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::InvalidTimezoneError(_)
            | Error::DatabaseLockError
            | Error::TokenError(_)
            | Error::CsvError(_) => "internal_error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal errors are not intended to be shown to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::Value;

    use crate::Error;

    async fn response_json(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn not_found_has_code_and_message() {
        let (status, body) = response_json(Error::NotFound).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
        assert_eq!(
            body["error"]["message"],
            "the requested resource could not be found"
        );
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) =
            response_json(Error::CsvError("disk on fire at /secret/path".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "internal_error");
        assert!(
            !body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("/secret/path")
        );
    }

    #[tokio::test]
    async fn duplicate_category_is_conflict() {
        let (status, body) =
            response_json(Error::DuplicateCategoryName("Food".to_owned())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "duplicate_category_name");
    }

    #[test]
    fn query_returned_no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}

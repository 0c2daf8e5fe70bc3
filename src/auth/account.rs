//! Route handlers for the logged in user's own account.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::{PasswordHash, User, UserID, ValidatedPassword, get_user_by_id, update_password},
};

/// The state needed to read and update the user's account.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The bcrypt cost for hashing new passwords.
    pub password_hash_cost: u32,
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that returns the logged in user.
pub async fn get_current_user(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<User>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_user_by_id(user_id, &connection).map(Json)
}

/// The data for changing the logged in user's password.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChangePasswordForm {
    /// The password the user currently logs in with.
    pub current_password: String,
    /// The password to replace it with.
    pub new_password: String,
    /// The new password typed a second time.
    pub confirm_password: String,
}

/// A route handler for changing the logged in user's password.
///
/// # Errors
///
/// Returns an [Error::InvalidCredentials] if `current_password` is wrong, an
/// [Error::PasswordMismatch] if the new passwords differ, or an
/// [Error::TooWeak] if the new password is too easy to guess.
pub async fn change_password(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<ChangePasswordForm>,
) -> Result<StatusCode, Error> {
    let user = get_user_by_id(user_id, &*lock_connection(&state.db_connection)?)?;

    if !user.password_hash.verify(&form.current_password)? {
        return Err(Error::InvalidCredentials);
    }

    if form.new_password != form.confirm_password {
        return Err(Error::PasswordMismatch);
    }

    let password =
        ValidatedPassword::new(&form.new_password, &[user.name.as_ref(), user.email.as_ref()])?;
    let password_hash = PasswordHash::new(password, state.password_hash_cost)?;

    update_password(
        user_id,
        &password_hash,
        &*lock_connection(&state.db_connection)?,
    )?;
    tracing::info!("Changed password for user {user_id}");

    Ok(StatusCode::NO_CONTENT)
}

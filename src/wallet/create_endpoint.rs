//! Defines the endpoint for creating a new wallet.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::{Connection, params};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::UserID,
    name::Name,
    wallet::{
        Wallet, WalletForm,
        core::{ensure_unique_name, map_wallet_name_error},
    },
};

/// The state needed to create a wallet.
#[derive(Debug, Clone)]
pub struct CreateWalletState {
    /// The database connection for managing wallets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateWalletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new wallet, responds with the wallet and 201.
pub async fn create_wallet_endpoint(
    State(state): State<CreateWalletState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<WalletForm>,
) -> Result<(StatusCode, Json<Wallet>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    let wallet = create_wallet(user_id, &form, OffsetDateTime::now_utc(), &connection)?;

    Ok((StatusCode::CREATED, Json(wallet)))
}

/// Insert a wallet for `user_id`.
///
/// # Errors
/// Returns [Error::EmptyName] or [Error::NameTooLong] for a bad name, and
/// [Error::DuplicateWalletName] if the user already has a wallet with the
/// same name ignoring case.
pub fn create_wallet(
    user_id: UserID,
    form: &WalletForm,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Wallet, Error> {
    let name = Name::new(&form.name)?;
    ensure_unique_name(user_id, &name, None, connection)?;

    connection
        .execute(
            "INSERT INTO wallet (user_id, name, kind, initial_balance, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id.as_i64(),
                name.as_ref(),
                form.kind,
                form.initial_balance,
                created_at
            ],
        )
        .map_err(|error| map_wallet_name_error(error, &name))?;

    Ok(Wallet {
        id: connection.last_insert_rowid(),
        user_id,
        name,
        kind: form.kind,
        initial_balance: form.initial_balance,
        balance: form.initial_balance,
        created_at,
    })
}

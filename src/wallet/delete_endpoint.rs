//! Defines the endpoint for deleting a wallet.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, app_state::lock_connection, auth::UserID, wallet::WalletId,
};

/// The state needed to delete a wallet.
#[derive(Debug, Clone)]
pub struct DeleteWalletState {
    /// The database connection for managing wallets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteWalletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a wallet along with its transactions and budgets.
pub async fn delete_wallet_endpoint(
    State(state): State<DeleteWalletState>,
    Extension(user_id): Extension<UserID>,
    Path(wallet_id): Path<WalletId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let rows_affected = connection.execute(
        "DELETE FROM wallet WHERE id = ?1 AND user_id = ?2",
        (wallet_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tracing::info!("Deleted wallet {wallet_id} for user {user_id}");

    Ok(StatusCode::NO_CONTENT)
}

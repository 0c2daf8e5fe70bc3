//! Endpoints for reading wallets.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::UserID,
    wallet::{Wallet, WalletId, get_total_wallet_balance, get_wallet, get_wallets},
};

/// The state needed to read wallets.
#[derive(Debug, Clone)]
pub struct ListWalletsState {
    /// The database connection for reading wallets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListWalletsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The user's wallets and their combined balance.
#[derive(Debug, Serialize)]
pub struct WalletList {
    pub wallets: Vec<Wallet>,
    pub total_balance: f64,
}

/// List the user's wallets ordered by name.
pub async fn list_wallets_endpoint(
    State(state): State<ListWalletsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<WalletList>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    Ok(Json(WalletList {
        wallets: get_wallets(user_id, &connection)?,
        total_balance: get_total_wallet_balance(user_id, &connection)?,
    }))
}

/// Get a single wallet with its balance.
pub async fn get_wallet_endpoint(
    State(state): State<ListWalletsState>,
    Extension(user_id): Extension<UserID>,
    Path(wallet_id): Path<WalletId>,
) -> Result<Json<Wallet>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_wallet(wallet_id, user_id, &connection).map(Json)
}

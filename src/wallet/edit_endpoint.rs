//! Defines the endpoint for updating a wallet.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::{Connection, params};

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::UserID,
    name::Name,
    wallet::{
        Wallet, WalletForm, WalletId,
        core::{ensure_unique_name, map_wallet_name_error},
        get_wallet,
    },
};

/// The state needed to edit a wallet.
#[derive(Debug, Clone)]
pub struct EditWalletState {
    /// The database connection for managing wallets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditWalletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a wallet, responds with the updated wallet.
pub async fn edit_wallet_endpoint(
    State(state): State<EditWalletState>,
    Extension(user_id): Extension<UserID>,
    Path(wallet_id): Path<WalletId>,
    Json(form): Json<WalletForm>,
) -> Result<Json<Wallet>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_wallet(wallet_id, user_id, &form, &connection)?;

    get_wallet(wallet_id, user_id, &connection).map(Json)
}

fn update_wallet(
    wallet_id: WalletId,
    user_id: UserID,
    form: &WalletForm,
    connection: &Connection,
) -> Result<(), Error> {
    let name = Name::new(&form.name)?;
    // Ownership is checked before the name.
    get_wallet(wallet_id, user_id, connection)?;
    ensure_unique_name(user_id, &name, Some(wallet_id), connection)?;

    let rows_affected = connection
        .execute(
            "UPDATE wallet SET name = ?1, kind = ?2, initial_balance = ?3
             WHERE id = ?4 AND user_id = ?5",
            params![
                name.as_ref(),
                form.kind,
                form.initial_balance,
                wallet_id,
                user_id.as_i64()
            ],
        )
        .map_err(|error| map_wallet_name_error(error, &name))?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

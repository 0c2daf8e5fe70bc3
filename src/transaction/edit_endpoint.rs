//! Defines the endpoint for updating a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error,
    app_state::lock_connection,
    auth::UserID,
    timezone::local_today,
    transaction::{
        Transaction, TransactionBuilder, TransactionForm, TransactionId, update_transaction,
    },
};

use super::create_endpoint::CreateTransactionState;

/// Replace a transaction with the request body, applying the same checks as
/// creating one.
pub async fn edit_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Json(form): Json<TransactionForm>,
) -> Result<Json<Transaction>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let builder = TransactionBuilder::from(form).validate(user_id, today, &connection)?;

    update_transaction(transaction_id, user_id, builder, &connection).map(Json)
}

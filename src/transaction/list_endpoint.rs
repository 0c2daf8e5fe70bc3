//! Endpoints for reading transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::UserID,
    category::{CategoryId, TransactionKind},
    pagination::{Paginated, PaginationConfig},
    transaction::{Transaction, TransactionFilter, TransactionId, get_transaction, query_transactions},
    wallet::WalletId,
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to page through transactions.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query string for listing transactions.
///
/// The fields are spelled out instead of flattening [TransactionFilter]
/// because URL-encoded numbers cannot be parsed through a flattened struct.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListQuery {
    pub wallet_id: Option<WalletId>,
    pub category_id: Option<CategoryId>,
    pub kind: Option<TransactionKind>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl TransactionListQuery {
    pub(super) fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            wallet_id: self.wallet_id,
            category_id: self.category_id,
            kind: self.kind,
            from: self.from,
            to: self.to,
        }
    }
}

/// List the user's transactions newest first, one page at a time.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Paginated<Transaction>>, Error> {
    let page = state.pagination_config.resolve(query.page, query.per_page);
    let connection = lock_connection(&state.db_connection)?;

    let (transactions, total_count) =
        query_transactions(user_id, &query.filter(), page, &connection)?;

    Ok(Json(Paginated::new(transactions, page, total_count)))
}

/// Get a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<ListTransactionsState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_transaction(transaction_id, user_id, &connection).map(Json)
}

//! Transactions record money moving into or out of a wallet.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod export;
mod list_endpoint;
mod query;

pub use core::{
    Transaction, TransactionBuilder, TransactionForm, TransactionId, create_transaction,
    delete_transaction, get_transaction, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use export::export_transactions_endpoint;
pub use list_endpoint::{get_transaction_endpoint, list_transactions_endpoint};
pub use query::{TransactionFilter, query_export_rows, query_transactions};

//! Wallets are the places money is kept, e.g. cash, a bank account or an e-wallet.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    Wallet, WalletForm, WalletId, WalletKind, get_total_wallet_balance, get_wallet, get_wallets,
};
pub use create_endpoint::{create_wallet, create_wallet_endpoint};
pub use delete_endpoint::delete_wallet_endpoint;
pub use edit_endpoint::edit_wallet_endpoint;
pub use list_endpoint::{get_wallet_endpoint, list_wallets_endpoint};

#[cfg(test)]
pub(crate) use core::test_utils::insert_test_wallet;

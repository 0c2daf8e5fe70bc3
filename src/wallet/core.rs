//! Wallets hold money, their balance is derived from their transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, auth::UserID, database_id::DatabaseId, name::Name, text_enum::text_enum,
};

text_enum! {
    /// Where the money in a wallet is kept.
    pub enum WalletKind {
        /// Notes and coins.
        Cash => "cash",
        /// A bank account.
        Bank => "bank",
        /// A mobile payment app balance, e.g. GoPay or OVO.
        EWallet => "e_wallet",
        /// A credit card, usually carrying a negative balance.
        CreditCard => "credit_card",
        /// Anything else.
        Other => "other",
    }
}

pub type WalletId = DatabaseId;

/// A place where the user keeps money.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wallet {
    /// The id for the wallet.
    pub id: WalletId,
    /// The user that owns the wallet.
    pub user_id: UserID,
    /// The wallet's name, unique per user ignoring case.
    pub name: Name,
    /// What sort of wallet this is.
    pub kind: WalletKind,
    /// The amount of money in the wallet before any recorded transactions.
    pub initial_balance: f64,
    /// The initial balance plus income minus expenses.
    pub balance: f64,
    /// When the wallet was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The request body for creating or updating a wallet.
#[derive(Debug, Serialize, Deserialize)]
pub struct WalletForm {
    /// The wallet name.
    pub name: String,
    /// What sort of wallet this is.
    pub kind: WalletKind,
    /// The balance before any recorded transactions.
    #[serde(default)]
    pub initial_balance: f64,
}

/// Selects wallets with their balance computed from their transactions.
const SELECT_WALLET: &str = "SELECT w.id, w.user_id, w.name, w.kind, w.initial_balance,
        w.initial_balance + COALESCE((
            SELECT SUM(CASE WHEN t.kind = 'income' THEN t.amount ELSE -t.amount END)
            FROM \"transaction\" t
            WHERE t.wallet_id = w.id
        ), 0) AS balance,
        w.created_at
    FROM wallet w";

pub fn map_row_to_wallet(row: &Row) -> Result<Wallet, rusqlite::Error> {
    let raw_name: String = row.get(2)?;

    Ok(Wallet {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: Name::new_unchecked(&raw_name),
        kind: row.get(3)?,
        initial_balance: row.get(4)?,
        balance: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Get a wallet owned by `user_id` with its current balance.
///
/// # Errors
/// Returns [Error::NotFound] if the wallet does not exist or belongs to
/// another user.
pub fn get_wallet(
    wallet_id: WalletId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Wallet, Error> {
    connection
        .prepare(&format!(
            "{SELECT_WALLET} WHERE w.id = ?1 AND w.user_id = ?2"
        ))?
        .query_row((wallet_id, user_id.as_i64()), map_row_to_wallet)
        .map_err(|error| error.into())
}

/// Get all of the user's wallets ordered by name.
pub fn get_wallets(user_id: UserID, connection: &Connection) -> Result<Vec<Wallet>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_WALLET} WHERE w.user_id = ?1 ORDER BY w.name ASC"
        ))?
        .query_map([user_id.as_i64()], map_row_to_wallet)?
        .map(|maybe_wallet| maybe_wallet.map_err(|error| error.into()))
        .collect()
}

/// Get the total balance across all of the user's wallets.
///
/// # Errors
/// Returns [Error] if the SQL query fails.
pub fn get_total_wallet_balance(user_id: UserID, connection: &Connection) -> Result<f64, Error> {
    let total: f64 = connection.query_row(
        "SELECT
            COALESCE((SELECT SUM(initial_balance) FROM wallet WHERE user_id = ?1), 0)
            + COALESCE((
                SELECT SUM(CASE WHEN kind = 'income' THEN amount ELSE -amount END)
                FROM \"transaction\"
                WHERE user_id = ?1
            ), 0)",
        [user_id.as_i64()],
        |row| row.get(0),
    )?;

    Ok(total)
}

/// Check that none of the user's wallets other than `exclude` is called
/// `name`, ignoring letter case in any script.
///
/// # Errors
/// Returns [Error::DuplicateWalletName] on a clash, or [Error::SqlError] if
/// the wallets could not be loaded.
pub(super) fn ensure_unique_name(
    user_id: UserID,
    name: &Name,
    exclude: Option<WalletId>,
    connection: &Connection,
) -> Result<(), Error> {
    let key = name.comparison_key();
    let clash = get_wallets(user_id, connection)?
        .into_iter()
        .any(|wallet| Some(wallet.id) != exclude && wallet.name.comparison_key() == key);

    if clash {
        return Err(Error::DuplicateWalletName(name.to_string()));
    }

    Ok(())
}

/// Map a unique constraint violation to [Error::DuplicateWalletName].
pub(super) fn map_wallet_name_error(error: rusqlite::Error, name: &Name) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, _)
            if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::DuplicateWalletName(name.to_string())
        }
        error => error.into(),
    }
}

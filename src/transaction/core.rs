//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    category::{CategoryId, TransactionKind, get_category},
    database_id::DatabaseId,
    wallet::{WalletId, get_wallet},
};

// ============================================================================
// MODELS
// ============================================================================

pub type TransactionId = DatabaseId;

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// The wallet the money went into or came out of.
    pub wallet_id: WalletId,
    /// The category of the transaction, e.g. "Groceries", "Salary".
    pub category_id: Option<CategoryId>,
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// The amount of money, always greater than zero.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A free text note about what the transaction was for.
    pub note: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        wallet_id: WalletId,
        kind: TransactionKind,
        amount: f64,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            wallet_id,
            category_id: None,
            kind,
            amount,
            date,
            note: String::new(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Required fields are given to [Transaction::build], optional fields are set
/// with the builder methods. Call [TransactionBuilder::validate] before
/// saving a builder that came from a user.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The wallet the money went into or came out of.
    pub wallet_id: WalletId,

    /// The category of the transaction, if any.
    ///
    /// The category's kind must match the transaction's kind.
    pub category_id: Option<CategoryId>,

    /// Whether money was earned or spent.
    pub kind: TransactionKind,

    /// The amount of money. Must be a finite number greater than zero, the
    /// direction comes from `kind`.
    pub amount: f64,

    /// The date when the transaction occurred.
    ///
    /// The date must not be in the future, transactions record money that has
    /// already moved.
    pub date: Date,

    /// A note about the transaction, e.g. "Nasi goreng with the team".
    pub note: String,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set the note for the transaction.
    pub fn note(mut self, note: &str) -> Self {
        self.note = note.to_owned();
        self
    }

    /// Check the transaction against the user's data before saving it.
    ///
    /// The note is trimmed.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if the amount is not a finite number above zero,
    /// - [Error::FutureDate] if the date is after `today`,
    /// - [Error::InvalidWallet] if the wallet does not belong to `user_id`,
    /// - [Error::InvalidCategory] if the category does not belong to `user_id`,
    /// - [Error::CategoryKindMismatch] if the category is for the other kind.
    pub fn validate(
        mut self,
        user_id: UserID,
        today: Date,
        connection: &Connection,
    ) -> Result<Self, Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if self.date > today {
            return Err(Error::FutureDate(self.date));
        }

        match get_wallet(self.wallet_id, user_id, connection) {
            Ok(_) => {}
            Err(Error::NotFound) => return Err(Error::InvalidWallet(self.wallet_id)),
            Err(error) => return Err(error),
        }

        if let Some(category_id) = self.category_id {
            let category = match get_category(category_id, user_id, connection) {
                Ok(category) => category,
                Err(Error::NotFound) => return Err(Error::InvalidCategory(category_id)),
                Err(error) => return Err(error),
            };

            if category.kind != self.kind {
                return Err(Error::CategoryKindMismatch {
                    expected: self.kind,
                    actual: category.kind,
                });
            }
        }

        self.note = self.note.trim().to_owned();

        Ok(self)
    }
}

/// The request body for creating or updating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    pub wallet_id: WalletId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub kind: TransactionKind,
    pub amount: f64,
    pub date: Date,
    #[serde(default)]
    pub note: String,
}

impl From<TransactionForm> for TransactionBuilder {
    fn from(form: TransactionForm) -> Self {
        Transaction::build(form.wallet_id, form.kind, form.amount, form.date)
            .category_id(form.category_id)
            .note(&form.note)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_TRANSACTION: &str =
    "SELECT id, user_id, wallet_id, category_id, kind, amount, date, note FROM \"transaction\"";

/// Create a new transaction in the database from a builder.
///
/// The builder is saved as is, use [TransactionBuilder::validate] first for
/// data that came from a user.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, wallet_id, category_id, kind, amount, date, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, wallet_id, category_id, kind, amount, date, note",
        )?
        .query_row(
            (
                user_id.as_i64(),
                builder.wallet_id,
                builder.category_id,
                builder.kind,
                builder.amount,
                builder.date,
                builder.note,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of the user's transactions,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "{SELECT_TRANSACTION} WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Replace the fields of a transaction owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist or belongs to
/// another user.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "UPDATE \"transaction\"
             SET wallet_id = ?1, category_id = ?2, kind = ?3, amount = ?4, date = ?5, note = ?6
             WHERE id = ?7 AND user_id = ?8
             RETURNING id, user_id, wallet_id, category_id, kind, amount, date, note",
        )?
        .query_row(
            (
                builder.wallet_id,
                builder.category_id,
                builder.kind,
                builder.amount,
                builder.date,
                builder.note,
                id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Delete a transaction owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist or belongs to
/// another user.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        wallet_id: row.get(2)?,
        category_id: row.get(3)?,
        kind: row.get(4)?,
        amount: row.get(5)?,
        date: row.get(6)?,
        note: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod validation_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::{User, UserID},
        category::{NewCategory, TransactionKind, create_category},
        name::Name,
        test_utils::{create_test_user, get_test_connection},
        wallet::{Wallet, insert_test_wallet},
    };

    use super::Transaction;

    const TODAY: time::Date = date!(2026 - 10 - 16);

    fn setup() -> (Connection, User, Wallet) {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let wallet = insert_test_wallet("BCA", 0.0, user.id, &connection);

        (connection, user, wallet)
    }

    fn category(name: &str, kind: TransactionKind, user_id: UserID, connection: &Connection) -> i64 {
        create_category(
            user_id,
            NewCategory {
                name: Name::new_unchecked(name),
                kind,
                icon: None,
                color: None,
            },
            connection,
        )
        .unwrap()
        .id
    }

    #[test]
    fn valid_transaction_has_trimmed_note() {
        let (connection, user, wallet) = setup();
        let category_id = category("Makan", TransactionKind::Expense, user.id, &connection);

        let builder = Transaction::build(wallet.id, TransactionKind::Expense, 35_000.0, TODAY)
            .category_id(Some(category_id))
            .note("  Bakso  ")
            .validate(user.id, TODAY, &connection)
            .unwrap();

        assert_eq!(builder.note, "Bakso");
    }

    #[test]
    fn amount_must_be_positive() {
        let (connection, user, wallet) = setup();

        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = Transaction::build(wallet.id, TransactionKind::Expense, amount, TODAY)
                .validate(user.id, TODAY, &connection);

            assert!(
                matches!(result, Err(Error::NonPositiveAmount(_))),
                "want NonPositiveAmount for {amount}, got {result:?}"
            );
        }
    }

    #[test]
    fn future_date_is_rejected() {
        let (connection, user, wallet) = setup();

        let result = Transaction::build(
            wallet.id,
            TransactionKind::Income,
            10.0,
            date!(2026 - 10 - 17),
        )
        .validate(user.id, TODAY, &connection);

        assert_eq!(result, Err(Error::FutureDate(date!(2026 - 10 - 17))));
    }

    #[test]
    fn wallet_of_other_user_is_invalid() {
        let (connection, user, wallet) = setup();

        let result = Transaction::build(wallet.id, TransactionKind::Income, 10.0, TODAY).validate(
            UserID::new(user.id.as_i64() + 1),
            TODAY,
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidWallet(wallet.id)));
    }

    #[test]
    fn missing_category_is_invalid() {
        let (connection, user, wallet) = setup();

        let result = Transaction::build(wallet.id, TransactionKind::Income, 10.0, TODAY)
            .category_id(Some(77))
            .validate(user.id, TODAY, &connection);

        assert_eq!(result, Err(Error::InvalidCategory(77)));
    }

    #[test]
    fn category_kind_must_match() {
        let (connection, user, wallet) = setup();
        let salary = category("Gaji", TransactionKind::Income, user.id, &connection);

        let result = Transaction::build(wallet.id, TransactionKind::Expense, 10.0, TODAY)
            .category_id(Some(salary))
            .validate(user.id, TODAY, &connection);

        assert_eq!(
            result,
            Err(Error::CategoryKindMismatch {
                expected: TransactionKind::Expense,
                actual: TransactionKind::Income,
            })
        );
    }
}

#[cfg(test)]
mod database_tests {
    use time::macros::date;

    use crate::{
        Error,
        auth::UserID,
        category::TransactionKind,
        test_utils::{create_test_user, get_test_connection},
        wallet::insert_test_wallet,
    };

    use super::{
        Transaction, create_transaction, delete_transaction, get_transaction, update_transaction,
    };

    #[test]
    fn create_and_get_succeeds() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let wallet = insert_test_wallet("BCA", 0.0, user.id, &connection);

        let transaction = create_transaction(
            user.id,
            Transaction::build(wallet.id, TransactionKind::Expense, 12.5, date!(2026 - 10 - 05))
                .note("Kopi"),
            &connection,
        )
        .unwrap();

        assert_eq!(transaction.amount, 12.5);
        assert_eq!(transaction.note, "Kopi");
        assert_eq!(
            get_transaction(transaction.id, user.id, &connection),
            Ok(transaction)
        );
    }

    #[test]
    fn get_other_users_transaction_is_not_found() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let wallet = insert_test_wallet("BCA", 0.0, user.id, &connection);
        let transaction = create_transaction(
            user.id,
            Transaction::build(wallet.id, TransactionKind::Income, 1.0, date!(2026 - 10 - 05)),
            &connection,
        )
        .unwrap();

        let result = get_transaction(
            transaction.id,
            UserID::new(user.id.as_i64() + 1),
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_replaces_fields() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let wallet = insert_test_wallet("BCA", 0.0, user.id, &connection);
        let transaction = create_transaction(
            user.id,
            Transaction::build(wallet.id, TransactionKind::Income, 1.0, date!(2026 - 10 - 05)),
            &connection,
        )
        .unwrap();

        let updated = update_transaction(
            transaction.id,
            user.id,
            Transaction::build(wallet.id, TransactionKind::Expense, 2.0, date!(2026 - 10 - 06)),
            &connection,
        )
        .unwrap();

        assert_eq!(updated.id, transaction.id);
        assert_eq!(updated.kind, TransactionKind::Expense);
        assert_eq!(updated.date, date!(2026 - 10 - 06));
    }

    #[test]
    fn update_missing_transaction_is_not_found() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let wallet = insert_test_wallet("BCA", 0.0, user.id, &connection);

        let result = update_transaction(
            1,
            user.id,
            Transaction::build(wallet.id, TransactionKind::Expense, 2.0, date!(2026 - 10 - 06)),
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_twice_is_not_found() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let wallet = insert_test_wallet("BCA", 0.0, user.id, &connection);
        let transaction = create_transaction(
            user.id,
            Transaction::build(wallet.id, TransactionKind::Income, 1.0, date!(2026 - 10 - 05)),
            &connection,
        )
        .unwrap();

        assert_eq!(delete_transaction(transaction.id, user.id, &connection), Ok(()));
        assert_eq!(
            delete_transaction(transaction.id, user.id, &connection),
            Err(Error::NotFound)
        );
    }
}

//! Creates the application's database schema and keeps it up to date.
//!
//! The schema is built from an ordered list of migrations. The number of
//! migrations that have been applied is stored in SQLite's `user_version`
//! header field, so opening an existing database only runs the migrations it
//! has not seen yet.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::Error;

/// The schema migrations in the order they must be applied.
///
/// Migration `i` (zero-based) brings the schema to version `i + 1`.
/// Only ever append to this list, applied migrations must not be edited.
const MIGRATIONS: &[&str] = &[
    // 1: users, wallets, categories and transactions.
    "CREATE TABLE IF NOT EXISTS user (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS wallet (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
        name TEXT NOT NULL COLLATE NOCASE,
        kind TEXT NOT NULL,
        initial_balance REAL NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        UNIQUE(user_id, name)
    );

    CREATE TABLE IF NOT EXISTS category (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        kind TEXT NOT NULL,
        icon TEXT,
        color TEXT
    );

    CREATE TABLE IF NOT EXISTS \"transaction\" (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
        wallet_id INTEGER NOT NULL REFERENCES wallet(id) ON DELETE CASCADE,
        category_id INTEGER REFERENCES category(id) ON DELETE SET NULL,
        kind TEXT NOT NULL,
        amount REAL NOT NULL,
        date TEXT NOT NULL,
        note TEXT NOT NULL DEFAULT ''
    );",
    // 2: budgets and savings goals.
    "CREATE TABLE IF NOT EXISTS budget (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
        wallet_id INTEGER NOT NULL REFERENCES wallet(id) ON DELETE CASCADE,
        category_id INTEGER REFERENCES category(id) ON DELETE CASCADE,
        amount REAL NOT NULL,
        period TEXT NOT NULL,
        start_date TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS goal (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        target_amount REAL NOT NULL,
        current_amount REAL NOT NULL DEFAULT 0,
        deadline TEXT,
        created_at TEXT NOT NULL
    );",
    // 3: bill reminders.
    "CREATE TABLE IF NOT EXISTS bill (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        amount REAL NOT NULL,
        due_date TEXT NOT NULL,
        frequency TEXT NOT NULL,
        remind_days_before INTEGER NOT NULL DEFAULT 3,
        wallet_id INTEGER REFERENCES wallet(id) ON DELETE SET NULL,
        category_id INTEGER REFERENCES category(id) ON DELETE SET NULL,
        is_paid INTEGER NOT NULL DEFAULT 0,
        last_paid_date TEXT
    );",
    // 4: indexes for per-user queries.
    "CREATE INDEX IF NOT EXISTS idx_wallet_user ON wallet(user_id);
    CREATE UNIQUE INDEX IF NOT EXISTS idx_category_user_kind_name
        ON category(user_id, kind, name COLLATE NOCASE);
    CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
    CREATE INDEX IF NOT EXISTS idx_transaction_wallet ON \"transaction\"(wallet_id);
    CREATE INDEX IF NOT EXISTS idx_budget_user ON budget(user_id);
    CREATE INDEX IF NOT EXISTS idx_goal_user ON goal(user_id);
    CREATE INDEX IF NOT EXISTS idx_bill_user_due ON bill(user_id, due_date);",
];

/// The schema version of a database with every migration applied.
pub const LATEST_SCHEMA_VERSION: usize = MIGRATIONS.len();

/// Create the tables for the domain models and apply any pending migrations.
///
/// Foreign key enforcement is switched on for `connection`. All pending
/// migrations are applied in a single exclusive transaction, so either every
/// migration is applied or none are.
///
/// # Errors
/// Returns an [Error::SqlError] if a migration fails.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Foreign keys cannot be toggled inside a transaction.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;
    let current_version = schema_version(&transaction)?;

    for (index, migration) in MIGRATIONS.iter().enumerate().skip(current_version) {
        let version = index + 1;
        tracing::info!("Applying database migration {version} of {LATEST_SCHEMA_VERSION}");

        transaction.execute_batch(migration)?;
        transaction.pragma_update(None, "user_version", version as i64)?;
    }

    transaction.commit()?;

    Ok(())
}

/// Get the number of migrations that have been applied to the database.
///
/// # Errors
/// Returns an [Error::SqlError] if the version could not be read.
pub fn schema_version(connection: &Connection) -> Result<usize, Error> {
    let version: i64 = connection.pragma_query_value(None, "user_version", |row| row.get(0))?;

    Ok(usize::try_from(version).unwrap_or_default())
}

//! Budgets cap the spending from a wallet, optionally for one category.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    budget::{BudgetPeriod, period_containing},
    category::{CategoryId, TransactionKind, get_category},
    database_id::DatabaseId,
    wallet::{WalletId, get_wallet},
};

pub type BudgetId = DatabaseId;

/// A spending limit that resets every period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserID,
    /// The wallet whose expenses count towards the budget.
    pub wallet_id: WalletId,
    /// Limits the budget to one expense category. When `None` every expense
    /// in the wallet counts.
    pub category_id: Option<CategoryId>,
    /// The most that should be spent each period.
    pub amount: f64,
    pub period: BudgetPeriod,
    /// The first day of the first period.
    pub start_date: Date,
}

/// The request body for creating or updating a budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetForm {
    pub wallet_id: WalletId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub start_date: Date,
}

impl BudgetForm {
    /// Check the budget against the user's wallets and categories.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if `amount` is not a finite number above zero,
    /// - [Error::DateOutOfRange] if the first period ends past the last representable date,
    /// - [Error::InvalidWallet] if the wallet does not belong to `user_id`,
    /// - [Error::InvalidCategory] if the category does not belong to `user_id`,
    /// - [Error::CategoryKindMismatch] if the category is for income.
    pub fn validate(self, user_id: UserID, connection: &Connection) -> Result<Self, Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if period_containing(self.period, self.start_date, self.start_date).is_none() {
            return Err(Error::DateOutOfRange(self.start_date));
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

            if category.kind != TransactionKind::Expense {
                return Err(Error::CategoryKindMismatch {
                    expected: TransactionKind::Expense,
                    actual: category.kind,
                });
            }
        }

        Ok(self)
    }
}

/// How much of a budget has been used in its current period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub period_start: Date,
    pub period_end: Date,
    /// The total of the matching expenses in the period.
    pub spent: f64,
    /// The budget amount minus `spent`, negative when overspent.
    pub remaining: f64,
    pub percent_used: f64,
    pub is_over: bool,
}

/// Work out the status of `budget` for the period containing `today`.
///
/// # Errors
/// This function will return a:
/// - [Error::DateOutOfRange] if the period containing `today` ends past the
///   last representable date,
/// - or [Error::SqlError] if the spending could not be summed.
pub fn get_budget_status(
    budget: Budget,
    today: Date,
    connection: &Connection,
) -> Result<BudgetStatus, Error> {
    let period = period_containing(budget.period, budget.start_date, today)
        .ok_or(Error::DateOutOfRange(today))?;

    let spent: f64 = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\"
         WHERE user_id = ?1 AND wallet_id = ?2 AND kind = 'expense'
           AND (?3 IS NULL OR category_id = ?3)
           AND date BETWEEN ?4 AND ?5",
        (
            budget.user_id.as_i64(),
            budget.wallet_id,
            budget.category_id,
            period.start,
            period.end,
        ),
        |row| row.get(0),
    )?;

    Ok(BudgetStatus {
        period_start: period.start,
        period_end: period.end,
        spent,
        remaining: budget.amount - spent,
        percent_used: spent / budget.amount * 100.0,
        is_over: spent > budget.amount,
        budget,
    })
}

const SELECT_BUDGET: &str =
    "SELECT id, user_id, wallet_id, category_id, amount, period, start_date FROM budget";

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        wallet_id: row.get(2)?,
        category_id: row.get(3)?,
        amount: row.get(4)?,
        period: row.get(5)?,
        start_date: row.get(6)?,
    })
}

/// Save a validated budget.
pub fn create_budget(
    user_id: UserID,
    form: &BudgetForm,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "INSERT INTO budget (user_id, wallet_id, category_id, amount, period, start_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, wallet_id, category_id, amount, period, start_date",
        )?
        .query_row(
            (
                user_id.as_i64(),
                form.wallet_id,
                form.category_id,
                form.amount,
                form.period,
                form.start_date,
            ),
            map_budget_row,
        )
        .map_err(|error| error.into())
}

/// Get a budget owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the budget does not exist or belongs to
/// another user.
pub fn get_budget(id: BudgetId, user_id: UserID, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare(&format!("{SELECT_BUDGET} WHERE id = ?1 AND user_id = ?2"))?
        .query_row((id, user_id.as_i64()), map_budget_row)
        .map_err(|error| error.into())
}

/// Get all of the user's budgets, oldest first.
pub fn get_budgets(user_id: UserID, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(&format!("{SELECT_BUDGET} WHERE user_id = ?1 ORDER BY id ASC"))?
        .query_map([user_id.as_i64()], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Replace the fields of a budget owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the budget does not exist or belongs to
/// another user.
pub fn update_budget(
    id: BudgetId,
    user_id: UserID,
    form: &BudgetForm,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "UPDATE budget
             SET wallet_id = ?1, category_id = ?2, amount = ?3, period = ?4, start_date = ?5
             WHERE id = ?6 AND user_id = ?7
             RETURNING id, user_id, wallet_id, category_id, amount, period, start_date",
        )?
        .query_row(
            (
                form.wallet_id,
                form.category_id,
                form.amount,
                form.period,
                form.start_date,
                id,
                user_id.as_i64(),
            ),
            map_budget_row,
        )
        .map_err(|error| error.into())
}

/// Delete a budget owned by `user_id`.
pub fn delete_budget(id: BudgetId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

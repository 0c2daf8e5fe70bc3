//! A snapshot of the user's finances for the current month.

use axum::{Extension, Json, extract::State};
use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    app_state::lock_connection,
    auth::UserID,
    bill::{build_notifications, get_unpaid_bills},
    date_range::month_bounds,
    goal::count_active_goals,
    insights::weekly::{InsightsState, sum_expenses, sum_income},
    timezone::local_today,
    wallet::get_wallets,
};

/// Totals and counts across all of a user's wallets, goals and bills.
///
/// The income and expense totals only cover the current calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// The combined balance of every wallet.
    pub total_balance: f64,
    pub month_income: f64,
    pub month_expense: f64,
    pub wallet_count: u64,
    /// Goals that have not reached their target.
    pub active_goals: u64,
    /// Bills that are overdue, due today or due soon.
    pub upcoming_bills: u64,
}

/// Summarise the user's finances for the month containing `today`.
pub fn get_summary(user_id: UserID, today: Date, connection: &Connection) -> Result<Summary, Error> {
    let month = month_bounds(today).ok_or(Error::DateOutOfRange(today))?;
    let wallets = get_wallets(user_id, connection)?;
    let bills = get_unpaid_bills(user_id, connection)?;

    Ok(Summary {
        total_balance: wallets.iter().map(|wallet| wallet.balance).sum(),
        month_income: sum_income(user_id, month, connection)?,
        month_expense: sum_expenses(user_id, month, connection)?,
        wallet_count: wallets.len() as u64,
        active_goals: count_active_goals(user_id, connection)?,
        upcoming_bills: build_notifications(&bills, today).len() as u64,
    })
}

/// Summarise the current month, where "today" is taken in the server's
/// configured timezone.
///
/// # Errors
/// Returns an error if the timezone is unknown, the database lock is
/// poisoned or a query fails.
pub async fn summary_endpoint(
    State(state): State<InsightsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Summary>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    get_summary(user_id, today, &connection).map(Json)
}

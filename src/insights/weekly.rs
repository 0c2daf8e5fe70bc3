//! The weekly insights endpoint and the queries behind it.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, Duration};

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::UserID,
    date_range::{DateRange, week_bounds},
    insights::{InsightTransaction, WeeklyInsights, aggregate_week},
    timezone::local_today,
};

/// The state needed for insights.
#[derive(Debug, Clone)]
pub struct InsightsState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, used to find the current week.
    pub local_timezone: String,
}

impl FromRef<AppState> for InsightsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WeeklyInsightsQuery {
    /// Any date in the week to summarise, defaults to today.
    pub date: Option<Date>,
}

/// Summarise the Monday to Sunday week containing the requested date.
pub async fn weekly_insights_endpoint(
    State(state): State<InsightsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<WeeklyInsightsQuery>,
) -> Result<Json<WeeklyInsights>, Error> {
    let anchor_date = match query.date {
        Some(date) => date,
        None => local_today(&state.local_timezone)?,
    };
    let connection = lock_connection(&state.db_connection)?;

    get_weekly_insights(user_id, anchor_date, &connection).map(Json)
}

/// Build the insights for the week containing `anchor_date`.
///
/// # Errors
/// Returns [Error::DateOutOfRange] if the week or the one before it is not
/// representable, or an [Error::SqlError] if a query fails.
pub fn get_weekly_insights(
    user_id: UserID,
    anchor_date: Date,
    connection: &Connection,
) -> Result<WeeklyInsights, Error> {
    let out_of_range = || Error::DateOutOfRange(anchor_date);
    let week = week_bounds(anchor_date).ok_or_else(out_of_range)?;
    let previous_week = DateRange {
        start: week.start.checked_sub(Duration::weeks(1)).ok_or_else(out_of_range)?,
        end: week.end.checked_sub(Duration::weeks(1)).ok_or_else(out_of_range)?,
    };

    let transactions = get_insight_transactions(user_id, week, connection)?;
    let previous_week_expense = sum_expenses(user_id, previous_week, connection)?;

    Ok(aggregate_week(week, &transactions, previous_week_expense))
}

/// Get the user's transactions in `range` with their category names.
fn get_insight_transactions(
    user_id: UserID,
    range: DateRange,
    connection: &Connection,
) -> Result<Vec<InsightTransaction>, Error> {
    connection
        .prepare(
            "SELECT t.date, t.kind, t.amount, t.category_id, c.name
             FROM \"transaction\" t
             LEFT JOIN category c ON c.id = t.category_id
             WHERE t.user_id = ?1 AND t.date BETWEEN ?2 AND ?3",
        )?
        .query_map((user_id.as_i64(), range.start, range.end), |row| {
            Ok(InsightTransaction {
                date: row.get(0)?,
                kind: row.get(1)?,
                amount: row.get(2)?,
                category_id: row.get(3)?,
                category_name: row.get(4)?,
            })
        })?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Sum the user's expenses in `range`.
pub(super) fn sum_expenses(
    user_id: UserID,
    range: DateRange,
    connection: &Connection,
) -> Result<f64, Error> {
    sum_kind(user_id, "expense", range, connection)
}

/// Sum the user's income in `range`.
pub(super) fn sum_income(
    user_id: UserID,
    range: DateRange,
    connection: &Connection,
) -> Result<f64, Error> {
    sum_kind(user_id, "income", range, connection)
}

fn sum_kind(
    user_id: UserID,
    kind: &str,
    range: DateRange,
    connection: &Connection,
) -> Result<f64, Error> {
    let total = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\"
         WHERE user_id = ?1 AND kind = ?2 AND date BETWEEN ?3 AND ?4",
        (user_id.as_i64(), kind, range.start, range.end),
        |row| row.get(0),
    )?;

    Ok(total)
}

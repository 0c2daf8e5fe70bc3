//! Savings goals and the progress made towards them.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error, auth::UserID, database_id::DatabaseId, date_range::days_between, name::Name,
};

pub type GoalId = DatabaseId;

/// An amount of money the user is saving up for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    pub id: GoalId,
    pub user_id: UserID,
    pub name: Name,
    pub target_amount: f64,
    /// How much has been put towards the goal so far.
    pub current_amount: f64,
    pub deadline: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A goal with its progress worked out for a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    #[serde(flatten)]
    pub goal: Goal,
    /// How far along the goal is, capped at 100.
    pub progress_percent: f64,
    pub is_completed: bool,
    /// Days until the deadline, negative once it has passed.
    pub days_left: Option<i64>,
}

impl GoalProgress {
    /// Work out the progress of `goal` as of `today`.
    pub fn new(goal: Goal, today: Date) -> Self {
        let progress_percent = (goal.current_amount / goal.target_amount * 100.0).min(100.0);

        Self {
            progress_percent,
            is_completed: goal.current_amount >= goal.target_amount,
            days_left: goal.deadline.map(|deadline| days_between(today, deadline)),
            goal,
        }
    }
}

/// The request body for creating or updating a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalForm {
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<Date>,
}

/// The checked fields of a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub name: Name,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<Date>,
}

impl TryFrom<GoalForm> for NewGoal {
    type Error = Error;

    fn try_from(form: GoalForm) -> Result<Self, Self::Error> {
        let name = Name::new(&form.name)?;

        if !form.target_amount.is_finite() || form.target_amount <= 0.0 {
            return Err(Error::NonPositiveAmount(form.target_amount));
        }

        if !form.current_amount.is_finite() || form.current_amount < 0.0 {
            return Err(Error::NegativeAmount(form.current_amount));
        }

        Ok(Self {
            name,
            target_amount: form.target_amount,
            current_amount: form.current_amount,
            deadline: form.deadline,
        })
    }
}

const SELECT_GOAL: &str =
    "SELECT id, user_id, name, target_amount, current_amount, deadline, created_at FROM goal";

const RETURNING_GOAL: &str =
    "RETURNING id, user_id, name, target_amount, current_amount, deadline, created_at";

fn map_goal_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    let raw_name: String = row.get(2)?;

    Ok(Goal {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: Name::new_unchecked(&raw_name),
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        deadline: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Create a new goal.
pub fn create_goal(
    user_id: UserID,
    goal: NewGoal,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Goal, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO goal (user_id, name, target_amount, current_amount, deadline, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             {RETURNING_GOAL}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                goal.name.as_ref(),
                goal.target_amount,
                goal.current_amount,
                goal.deadline,
                created_at,
            ),
            map_goal_row,
        )
        .map_err(|error| error.into())
}

/// Get a goal owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the goal does not exist or belongs to
/// another user.
pub fn get_goal(id: GoalId, user_id: UserID, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(&format!("{SELECT_GOAL} WHERE id = ?1 AND user_id = ?2"))?
        .query_row((id, user_id.as_i64()), map_goal_row)
        .map_err(|error| error.into())
}

/// Get the user's goals. Goals with the nearest deadline come first, goals
/// without a deadline last.
pub fn get_goals(user_id: UserID, connection: &Connection) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_GOAL} WHERE user_id = ?1 ORDER BY deadline IS NULL, deadline ASC, id ASC"
        ))?
        .query_map([user_id.as_i64()], map_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Count the goals that have not reached their target.
pub fn count_active_goals(user_id: UserID, connection: &Connection) -> Result<u64, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM goal WHERE user_id = ?1 AND current_amount < target_amount",
        [user_id.as_i64()],
        |row| row.get(0),
    )?;

    Ok(u64::try_from(count).unwrap_or_default())
}

/// Replace the fields of a goal owned by `user_id`.
pub fn update_goal(
    id: GoalId,
    user_id: UserID,
    goal: NewGoal,
    connection: &Connection,
) -> Result<Goal, Error> {
    connection
        .prepare(&format!(
            "UPDATE goal SET name = ?1, target_amount = ?2, current_amount = ?3, deadline = ?4
             WHERE id = ?5 AND user_id = ?6
             {RETURNING_GOAL}"
        ))?
        .query_row(
            (
                goal.name.as_ref(),
                goal.target_amount,
                goal.current_amount,
                goal.deadline,
                id,
                user_id.as_i64(),
            ),
            map_goal_row,
        )
        .map_err(|error| error.into())
}

/// Delete a goal owned by `user_id`.
pub fn delete_goal(id: GoalId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM goal WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Add `amount` to the money saved for a goal. A negative `amount` is a
/// withdrawal.
///
/// # Errors
/// This function will return a:
/// - [Error::ZeroContribution] if `amount` is zero or not finite,
/// - [Error::NotFound] if the goal does not belong to `user_id`,
/// - [Error::InsufficientGoalFunds] if a withdrawal is larger than the saved amount.
pub fn contribute_to_goal(
    id: GoalId,
    user_id: UserID,
    amount: f64,
    connection: &Connection,
) -> Result<Goal, Error> {
    if amount == 0.0 || !amount.is_finite() {
        return Err(Error::ZeroContribution);
    }

    let goal = get_goal(id, user_id, connection)?;

    if goal.current_amount + amount < 0.0 {
        return Err(Error::InsufficientGoalFunds {
            requested: -amount,
            available: goal.current_amount,
        });
    }

    connection
        .prepare(&format!(
            "UPDATE goal SET current_amount = current_amount + ?1
             WHERE id = ?2 AND user_id = ?3
             {RETURNING_GOAL}"
        ))?
        .query_row((amount, id, user_id.as_i64()), map_goal_row)
        .map_err(|error| error.into())
}

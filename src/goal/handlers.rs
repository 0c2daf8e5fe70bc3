//! Route handlers for savings goals.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::UserID,
    goal::{
        GoalForm, GoalId, GoalProgress, NewGoal, contribute_to_goal, create_goal, delete_goal,
        get_goal, get_goals, update_goal,
    },
    timezone::local_today,
};

/// The state needed by the goal handlers.
#[derive(Debug, Clone)]
pub struct GoalState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, used to count the days left.
    pub local_timezone: String,
}

impl FromRef<AppState> for GoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The request body for adding to or taking from a goal.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContributionForm {
    /// The amount to add, negative to withdraw.
    pub amount: f64,
}

pub async fn create_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<GoalForm>,
) -> Result<(StatusCode, Json<GoalProgress>), Error> {
    let new_goal = NewGoal::try_from(form)?;
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let goal = create_goal(user_id, new_goal, OffsetDateTime::now_utc(), &connection)?;

    Ok((StatusCode::CREATED, Json(GoalProgress::new(goal, today))))
}

pub async fn list_goals_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<GoalProgress>>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let goals = get_goals(user_id, &connection)?
        .into_iter()
        .map(|goal| GoalProgress::new(goal, today))
        .collect();

    Ok(Json(goals))
}

pub async fn get_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
) -> Result<Json<GoalProgress>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let goal = get_goal(goal_id, user_id, &connection)?;

    Ok(Json(GoalProgress::new(goal, today)))
}

pub async fn update_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
    Json(form): Json<GoalForm>,
) -> Result<Json<GoalProgress>, Error> {
    let new_goal = NewGoal::try_from(form)?;
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let goal = update_goal(goal_id, user_id, new_goal, &connection)?;

    Ok(Json(GoalProgress::new(goal, today)))
}

pub async fn delete_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_goal(goal_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Add money to a goal or withdraw from it.
pub async fn contribute_to_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
    Json(form): Json<ContributionForm>,
) -> Result<Json<GoalProgress>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let goal = contribute_to_goal(goal_id, user_id, form.amount, &connection)?;
    tracing::debug!("Goal {goal_id} now has {}", goal.current_amount);

    Ok(Json(GoalProgress::new(goal, today)))
}

//! Route handlers for managing budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::UserID,
    budget::{
        BudgetForm, BudgetId, BudgetStatus, create_budget, delete_budget, get_budget,
        get_budget_status, get_budgets, update_budget,
    },
    timezone::local_today,
};

/// The state needed by the budget handlers.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, used to find today's period.
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Create a budget and respond with its current status and 201.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<BudgetForm>,
) -> Result<(StatusCode, Json<BudgetStatus>), Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let form = form.validate(user_id, &connection)?;
    let budget = create_budget(user_id, &form, &connection)?;
    let status = get_budget_status(budget, today, &connection)?;

    Ok((StatusCode::CREATED, Json(status)))
}

/// List the user's budgets with the status of each.
pub async fn list_budgets_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<BudgetStatus>>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    get_budgets(user_id, &connection)?
        .into_iter()
        .map(|budget| get_budget_status(budget, today, &connection))
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

/// Get a single budget with its status.
pub async fn get_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
) -> Result<Json<BudgetStatus>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let budget = get_budget(budget_id, user_id, &connection)?;

    get_budget_status(budget, today, &connection).map(Json)
}

/// Replace a budget's fields.
pub async fn update_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
    Json(form): Json<BudgetForm>,
) -> Result<Json<BudgetStatus>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    // Report a missing budget before complaining about the body.
    get_budget(budget_id, user_id, &connection)?;
    let form = form.validate(user_id, &connection)?;
    let budget = update_budget(budget_id, user_id, &form, &connection)?;

    get_budget_status(budget, today, &connection).map(Json)
}

/// Delete a budget, responds with 204.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_budget(budget_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

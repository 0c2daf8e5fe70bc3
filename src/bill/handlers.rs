//! Route handlers for bill reminders.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::UserID,
    bill::{
        BillForm, BillId, BillNotification, BillPayment, BillView, build_notifications,
        create_bill, delete_bill, get_bill, get_bills, get_unpaid_bills, pay_bill, update_bill,
    },
    timezone::local_today,
};

/// The state needed by the bill handlers.
#[derive(Debug, Clone)]
pub struct BillState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, used to decide what is due.
    pub local_timezone: String,
}

impl FromRef<AppState> for BillState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The request body for paying a bill.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PayBillForm {
    /// Also record an expense for the bill in its wallet.
    #[serde(default)]
    pub record_transaction: bool,
}

pub async fn create_bill_endpoint(
    State(state): State<BillState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<BillForm>,
) -> Result<(StatusCode, Json<BillView>), Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let new_bill = form.validate(user_id, &connection)?;
    let bill = create_bill(user_id, new_bill, &connection)?;

    Ok((StatusCode::CREATED, Json(BillView::new(bill, today))))
}

/// List the user's bills by due date, each with its status.
pub async fn list_bills_endpoint(
    State(state): State<BillState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<BillView>>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let bills = get_bills(user_id, &connection)?
        .into_iter()
        .map(|bill| BillView::new(bill, today))
        .collect();

    Ok(Json(bills))
}

pub async fn get_bill_endpoint(
    State(state): State<BillState>,
    Extension(user_id): Extension<UserID>,
    Path(bill_id): Path<BillId>,
) -> Result<Json<BillView>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let bill = get_bill(bill_id, user_id, &connection)?;

    Ok(Json(BillView::new(bill, today)))
}

pub async fn update_bill_endpoint(
    State(state): State<BillState>,
    Extension(user_id): Extension<UserID>,
    Path(bill_id): Path<BillId>,
    Json(form): Json<BillForm>,
) -> Result<Json<BillView>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    get_bill(bill_id, user_id, &connection)?;
    let new_bill = form.validate(user_id, &connection)?;
    let bill = update_bill(bill_id, user_id, new_bill, &connection)?;

    Ok(Json(BillView::new(bill, today)))
}

pub async fn delete_bill_endpoint(
    State(state): State<BillState>,
    Extension(user_id): Extension<UserID>,
    Path(bill_id): Path<BillId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_bill(bill_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Pay a bill today, optionally recording the expense.
pub async fn pay_bill_endpoint(
    State(state): State<BillState>,
    Extension(user_id): Extension<UserID>,
    Path(bill_id): Path<BillId>,
    Json(form): Json<PayBillForm>,
) -> Result<Json<BillPayment>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let payment = pay_bill(bill_id, user_id, form.record_transaction, today, &connection)?;
    tracing::info!(
        "User {user_id} paid bill {bill_id}, next due {}",
        payment.bill.due_date
    );

    Ok(Json(payment))
}

/// The reminders for the user's unpaid bills as of today.
pub async fn bill_notifications_endpoint(
    State(state): State<BillState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<BillNotification>>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let bills = get_unpaid_bills(user_id, &connection)?;

    Ok(Json(build_notifications(&bills, today)))
}

//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router, middleware,
    routing::{get, post, put},
};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::{
        auth_guard, change_password, get_current_user, post_log_in, post_log_out, register_user,
    },
    bill::{
        bill_notifications_endpoint, create_bill_endpoint, delete_bill_endpoint, get_bill_endpoint,
        list_bills_endpoint, pay_bill_endpoint, update_bill_endpoint,
    },
    budget::{
        create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint,
        list_budgets_endpoint, update_budget_endpoint,
    },
    category::{
        create_category_endpoint, create_default_categories_endpoint, delete_category_endpoint,
        get_category_endpoint, list_categories_endpoint, update_category_endpoint,
    },
    endpoints,
    goal::{
        contribute_to_goal_endpoint, create_goal_endpoint, delete_goal_endpoint,
        get_goal_endpoint, list_goals_endpoint, update_goal_endpoint,
    },
    insights::{summary_endpoint, weekly_insights_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        export_transactions_endpoint, get_transaction_endpoint, list_transactions_endpoint,
    },
    wallet::{
        create_wallet_endpoint, delete_wallet_endpoint, edit_wallet_endpoint,
        get_wallet_endpoint, list_wallets_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in));

    let protected_routes = Router::new()
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(endpoints::ME, get(get_current_user))
        .route(endpoints::PASSWORD, put(change_password))
        .route(
            endpoints::WALLETS,
            get(list_wallets_endpoint).post(create_wallet_endpoint),
        )
        .route(
            endpoints::WALLET,
            get(get_wallet_endpoint)
                .put(edit_wallet_endpoint)
                .delete(delete_wallet_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::DEFAULT_CATEGORIES,
            post(create_default_categories_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::EXPORT_TRANSACTIONS,
            get(export_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(list_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(
            endpoints::BUDGET,
            get(get_budget_endpoint)
                .put(update_budget_endpoint)
                .delete(delete_budget_endpoint),
        )
        .route(
            endpoints::GOALS,
            get(list_goals_endpoint).post(create_goal_endpoint),
        )
        .route(
            endpoints::GOAL,
            get(get_goal_endpoint)
                .put(update_goal_endpoint)
                .delete(delete_goal_endpoint),
        )
        .route(
            endpoints::GOAL_CONTRIBUTIONS,
            post(contribute_to_goal_endpoint),
        )
        .route(
            endpoints::BILLS,
            get(list_bills_endpoint).post(create_bill_endpoint),
        )
        .route(
            endpoints::BILL_NOTIFICATIONS,
            get(bill_notifications_endpoint),
        )
        .route(
            endpoints::BILL,
            get(get_bill_endpoint)
                .put(update_bill_endpoint)
                .delete(delete_bill_endpoint),
        )
        .route(endpoints::PAY_BILL, post(pay_bill_endpoint))
        .route(endpoints::WEEKLY_INSIGHTS, get(weekly_insights_endpoint))
        .route(endpoints::SUMMARY, get(summary_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Lets load balancers and uptime checks know the server is up.
async fn get_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/wallets/{wallet_id}', use [format_endpoint].

/// The route for checking that the server is up.
pub const HEALTH: &str = "/api/health";

/// The route for registering a new user.
pub const REGISTER: &str = "/api/auth/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/auth/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/auth/log_out";
/// The route for the current user's account.
pub const ME: &str = "/api/auth/me";
/// The route for changing the current user's password.
pub const PASSWORD: &str = "/api/auth/password";

/// The route to list and create wallets.
pub const WALLETS: &str = "/api/wallets";
/// The route to access a single wallet.
pub const WALLET: &str = "/api/wallets/{wallet_id}";

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to add the default categories for a user.
pub const DEFAULT_CATEGORIES: &str = "/api/categories/defaults";

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to download transactions as CSV.
pub const EXPORT_TRANSACTIONS: &str = "/api/transactions/export.csv";

/// The route to list and create budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to access a single budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";

/// The route to list and create savings goals.
pub const GOALS: &str = "/api/goals";
/// The route to access a single savings goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// The route to add money to or take money from a savings goal.
pub const GOAL_CONTRIBUTIONS: &str = "/api/goals/{goal_id}/contributions";

/// The route to list and create bill reminders.
pub const BILLS: &str = "/api/bills";
/// The route to access a single bill reminder.
pub const BILL: &str = "/api/bills/{bill_id}";
/// The route to mark a bill as paid.
pub const PAY_BILL: &str = "/api/bills/{bill_id}/pay";
/// The route for reminders about bills that are due soon or overdue.
pub const BILL_NOTIFICATIONS: &str = "/api/bills/notifications";

/// The route for the weekly spending summary.
pub const WEEKLY_INSIGHTS: &str = "/api/insights/weekly";
/// The route for the dashboard summary.
pub const SUMMARY: &str = "/api/insights/summary";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/wallets/{wallet_id}', '{wallet_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

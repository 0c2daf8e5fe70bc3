//! Budgets set a spending limit per week or month for a wallet.

mod core;
mod handlers;
mod period;

pub use core::{
    Budget, BudgetForm, BudgetId, BudgetStatus, create_budget, delete_budget, get_budget,
    get_budget_status, get_budgets, update_budget,
};
pub use handlers::{
    create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint, list_budgets_endpoint,
    update_budget_endpoint,
};
pub use period::{BudgetPeriod, period_containing};

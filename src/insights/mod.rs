//! Aggregated views over the user's transactions, goals and bills.

mod aggregation;
mod summary;
mod weekly;

pub use aggregation::{
    CategoryTotal, DailyTotal, InsightTransaction, UNCATEGORISED_LABEL, WeeklyInsights,
    aggregate_week,
};
pub use summary::{Summary, get_summary, summary_endpoint};
pub use weekly::{get_weekly_insights, weekly_insights_endpoint};

//! Aggregates a week of transactions into totals, daily sums and top categories.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{
    category::{CategoryId, TransactionKind},
    date_range::DateRange,
};

/// The label used for expenses without a category.
pub const UNCATEGORISED_LABEL: &str = "Uncategorised";

/// The number of categories listed in [WeeklyInsights::top_categories].
const TOP_CATEGORY_COUNT: usize = 5;

/// The parts of a transaction needed for insights.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightTransaction {
    pub date: Date,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
}

/// Income and expenses on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: Date,
    pub income: f64,
    pub expense: f64,
}

/// Spending in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub amount: f64,
    /// The share of the week's expenses, from 0 to 100.
    pub percent: f64,
}

/// A summary of the money that came in and went out in one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyInsights {
    pub week_start: Date,
    pub week_end: Date,
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
    pub previous_week_expense: f64,
    /// The change in expenses from the previous week, `None` when nothing was
    /// spent in the previous week.
    pub expense_change_percent: Option<f64>,
    /// One entry per day of the week, including days without transactions.
    pub daily: Vec<DailyTotal>,
    pub top_categories: Vec<CategoryTotal>,
    pub average_daily_expense: f64,
}

/// Build the insights for `week` from the transactions dated inside it.
///
/// Transactions outside `week` are ignored.
pub fn aggregate_week(
    week: DateRange,
    transactions: &[InsightTransaction],
    previous_week_expense: f64,
) -> WeeklyInsights {
    let transactions: Vec<_> = transactions
        .iter()
        .filter(|transaction| week.contains(transaction.date))
        .collect();

    let total_income = sum_kind(&transactions, TransactionKind::Income);
    let total_expense = sum_kind(&transactions, TransactionKind::Expense);

    let expense_change_percent = (previous_week_expense > 0.0).then(|| {
        (total_expense - previous_week_expense) / previous_week_expense * 100.0
    });

    let day_count = week.days().count().max(1);

    WeeklyInsights {
        week_start: week.start,
        week_end: week.end,
        total_income,
        total_expense,
        net: total_income - total_expense,
        previous_week_expense,
        expense_change_percent,
        daily: daily_totals(week, &transactions),
        top_categories: top_categories(&transactions, total_expense),
        average_daily_expense: total_expense / day_count as f64,
    }
}

fn sum_kind(transactions: &[&InsightTransaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
        .map(|transaction| transaction.amount)
        .sum()
}

fn daily_totals(week: DateRange, transactions: &[&InsightTransaction]) -> Vec<DailyTotal> {
    let mut totals: Vec<DailyTotal> = week
        .days()
        .map(|date| DailyTotal {
            date,
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for transaction in transactions {
        let index = (transaction.date - week.start).whole_days();
        let Some(day) = usize::try_from(index)
            .ok()
            .and_then(|index| totals.get_mut(index))
        else {
            continue;
        };

        match transaction.kind {
            TransactionKind::Income => day.income += transaction.amount,
            TransactionKind::Expense => day.expense += transaction.amount,
        }
    }

    totals
}

/// The biggest expense categories, largest first, with ties broken by name.
fn top_categories(transactions: &[&InsightTransaction], total_expense: f64) -> Vec<CategoryTotal> {
    let mut by_category: HashMap<Option<CategoryId>, CategoryTotal> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Expense)
    {
        let name = transaction
            .category_name
            .clone()
            .unwrap_or_else(|| UNCATEGORISED_LABEL.to_owned());

        by_category
            .entry(transaction.category_id)
            .or_insert_with(|| CategoryTotal {
                category_id: transaction.category_id,
                name,
                amount: 0.0,
                percent: 0.0,
            })
            .amount += transaction.amount;
    }

    let mut totals: Vec<_> = by_category
        .into_values()
        .map(|mut total| {
            if total_expense > 0.0 {
                total.percent = total.amount / total_expense * 100.0;
            }
            total
        })
        .collect();

    totals.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.name.cmp(&b.name))
    });
    totals.truncate(TOP_CATEGORY_COUNT);

    totals
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{category::TransactionKind, date_range::week_bounds};

    use super::{InsightTransaction, UNCATEGORISED_LABEL, aggregate_week};

    fn expense(date: time::Date, amount: f64, category: Option<(i64, &str)>) -> InsightTransaction {
        InsightTransaction {
            date,
            kind: TransactionKind::Expense,
            amount,
            category_id: category.map(|(id, _)| id),
            category_name: category.map(|(_, name)| name.to_owned()),
        }
    }

    fn income(date: time::Date, amount: f64) -> InsightTransaction {
        InsightTransaction {
            date,
            kind: TransactionKind::Income,
            amount,
            category_id: None,
            category_name: None,
        }
    }

    #[test]
    fn empty_week_has_seven_zero_days() {
        let week = week_bounds(date!(2026 - 10 - 14)).unwrap();

        let insights = aggregate_week(week, &[], 0.0);

        assert_eq!(insights.week_start, date!(2026 - 10 - 12));
        assert_eq!(insights.week_end, date!(2026 - 10 - 18));
        assert_eq!(insights.daily.len(), 7);
        assert!(insights.daily.iter().all(|day| day.income == 0.0 && day.expense == 0.0));
        assert_eq!(insights.expense_change_percent, None);
        assert!(insights.top_categories.is_empty());
        assert_eq!(insights.average_daily_expense, 0.0);
    }

    #[test]
    fn totals_and_daily_sums() {
        let week = week_bounds(date!(2026 - 10 - 14)).unwrap();
        let transactions = [
            income(date!(2026 - 10 - 12), 5_000_000.0),
            expense(date!(2026 - 10 - 12), 50_000.0, Some((1, "Makan"))),
            expense(date!(2026 - 10 - 18), 20_000.0, None),
            // The previous Sunday is not part of the week.
            expense(date!(2026 - 10 - 11), 999.0, None),
        ];

        let insights = aggregate_week(week, &transactions, 35_000.0);

        assert_eq!(insights.total_income, 5_000_000.0);
        assert_eq!(insights.total_expense, 70_000.0);
        assert_eq!(insights.net, 4_930_000.0);
        assert_eq!(insights.daily[0].income, 5_000_000.0);
        assert_eq!(insights.daily[0].expense, 50_000.0);
        assert_eq!(insights.daily[6].expense, 20_000.0);
        assert_eq!(insights.expense_change_percent, Some(100.0));
        assert_eq!(insights.average_daily_expense, 10_000.0);
    }

    #[test]
    fn top_categories_are_ranked_and_capped() {
        let week = week_bounds(date!(2026 - 10 - 14)).unwrap();
        let day = date!(2026 - 10 - 13);
        let mut transactions = vec![expense(day, 10.0, None), expense(day, 30.0, None)];
        for (id, amount) in [(1, 5.0), (2, 25.0), (3, 15.0), (4, 10.0), (5, 5.0)] {
            let name = format!("Kategori {id}");
            transactions.push(expense(day, amount, Some((id, name.as_str()))));
        }

        let insights = aggregate_week(week, &transactions, 0.0);

        let names: Vec<_> = insights
            .top_categories
            .iter()
            .map(|category| category.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![UNCATEGORISED_LABEL, "Kategori 2", "Kategori 3", "Kategori 4", "Kategori 1"]
        );
        assert_eq!(insights.top_categories[0].category_id, None);
        assert_eq!(insights.top_categories[0].amount, 40.0);
        assert_eq!(insights.top_categories[0].percent, 40.0);
    }
}

//! Works out which budget period a date falls in.

use time::{Date, Duration};

use crate::{
    date_range::{DateRange, add_months},
    text_enum::text_enum,
};

text_enum! {
    /// How often a budget's spending limit resets.
    pub enum BudgetPeriod {
        /// Every seven days, starting on the weekday of the budget's start date.
        Weekly => "weekly",
        /// Every month, starting on the day of the month of the budget's start date.
        Monthly => "monthly",
    }
}

/// The period of a budget starting on `start_date` that contains `reference`.
///
/// A `reference` before `start_date` is treated as `start_date`, so the first
/// period is returned.
///
/// Monthly periods are counted from `start_date` rather than from the previous
/// period, so a budget starting on the 31st runs from the 31st (or the
/// month's last day) in every month.
///
/// Returns `None` if the period ends past the last representable date.
pub fn period_containing(
    period: BudgetPeriod,
    start_date: Date,
    reference: Date,
) -> Option<DateRange> {
    let reference = reference.max(start_date);

    match period {
        BudgetPeriod::Weekly => {
            let elapsed_weeks = (reference - start_date).whole_days() / 7;
            let start = start_date.checked_add(Duration::weeks(elapsed_weeks))?;

            Some(DateRange {
                start,
                end: start.checked_add(Duration::days(6))?,
            })
        }
        BudgetPeriod::Monthly => {
            let mut months = month_index(reference) - month_index(start_date);
            if add_months(start_date, months)? > reference {
                months -= 1;
            }

            Some(DateRange {
                start: add_months(start_date, months)?,
                end: add_months(start_date, months + 1)?.previous_day()?,
            })
        }
    }
}

/// The number of months since the start of year zero.
fn month_index(date: Date) -> u32 {
    let months = i64::from(date.year()) * 12 + i64::from(u8::from(date.month())) - 1;

    u32::try_from(months).unwrap_or_default()
}

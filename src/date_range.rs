//! Calendar helpers for weeks, months and inclusive date ranges.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterate over every day in the range in order.
    pub fn days(self) -> impl Iterator<Item = Date> {
        let end = self.end;

        std::iter::successors(Some(self.start), move |date| {
            date.next_day().filter(|next| *next <= end)
        })
    }
}

/// The Monday to Sunday week containing `anchor_date`, or `None` if the
/// week runs past the last representable date.
pub fn week_bounds(anchor_date: Date) -> Option<DateRange> {
    let weekday_number = anchor_date.weekday().number_from_monday() as i64;
    let start = anchor_date.checked_sub(Duration::days(weekday_number - 1))?;
    let end = start.checked_add(Duration::days(6))?;

    Some(DateRange { start, end })
}

/// The calendar month containing `anchor_date`.
pub fn month_bounds(anchor_date: Date) -> Option<DateRange> {
    let year = anchor_date.year();
    let month = anchor_date.month();

    Some(DateRange {
        start: clamped_date(year, month, 1)?,
        end: clamped_date(year, month, last_day_of_month(year, month))?,
    })
}

/// Add `months` calendar months to `date`.
///
/// If the target month is shorter than `date`'s day of the month, the last
/// day of the target month is used, e.g. 31 January plus one month is
/// 28 February (or 29 February in a leap year).
///
/// Returns `None` if the result is past the last representable date.
pub fn add_months(date: Date, months: u32) -> Option<Date> {
    let mut year = date.year();
    let mut month = date.month();

    for _ in 0..months {
        if month == Month::December {
            year = year.checked_add(1)?;
        }
        month = month.next();
    }

    clamped_date(year, month, date.day())
}

/// Add one year to `date`, mapping 29 February to 28 February in common years.
pub fn add_year(date: Date) -> Option<Date> {
    clamped_date(date.year().checked_add(1)?, date.month(), date.day())
}

/// The date with `day` in the given month, or the month's last day if `day`
/// is past the end of the month. `None` if `year` is out of range.
pub fn clamped_date(year: i32, month: Month, day: u8) -> Option<Date> {
    let day = day.clamp(1, last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).ok()
}

/// The signed number of days from `from` to `to`.
pub fn days_between(from: Date, to: Date) -> i64 {
    (to - from).whole_days()
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

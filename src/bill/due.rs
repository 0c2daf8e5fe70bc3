//! Works out when bills are due and which ones the user should be reminded of.

use serde::Serialize;
use time::{Date, Duration};

use crate::{
    Error,
    bill::{Bill, BillId},
    currency::format_rupiah,
    date_range::{add_months, add_year, days_between},
    text_enum::text_enum,
};

text_enum! {
    /// How often a bill has to be paid.
    pub enum BillFrequency {
        /// Paid a single time.
        Once => "once",
        Weekly => "weekly",
        Monthly => "monthly",
        Yearly => "yearly",
    }
}

text_enum! {
    /// Where a bill stands relative to its due date.
    pub enum BillStatus {
        /// A one-off bill that has been paid.
        Paid => "paid",
        /// The due date has passed.
        Overdue => "overdue",
        DueToday => "due_today",
        /// Due within the bill's reminder window.
        DueSoon => "due_soon",
        /// Due after the reminder window.
        Upcoming => "upcoming",
    }
}

/// The signed number of days from `today` until the bill is due.
pub fn days_until_due(bill: &Bill, today: Date) -> i64 {
    days_between(today, bill.due_date)
}

/// The status of `bill` as of `today`.
pub fn bill_status(bill: &Bill, today: Date) -> BillStatus {
    if bill.is_paid {
        return BillStatus::Paid;
    }

    match days_until_due(bill, today) {
        days if days < 0 => BillStatus::Overdue,
        0 => BillStatus::DueToday,
        days if days <= i64::from(bill.remind_days_before) => BillStatus::DueSoon,
        _ => BillStatus::Upcoming,
    }
}

/// The due date after `due_date` for a recurring bill.
///
/// Monthly bills keep their day of the month where possible and fall back to
/// the month's last day, e.g. 31 January is followed by 28 February. Since the
/// next date is worked out from the current one, the day stays clamped after
/// that (28 March, 28 April, ...).
///
/// Returns `None` for bills that are only paid once.
///
/// # Errors
/// Returns [Error::DateOutOfRange] if the next due date would be past the
/// last representable date.
pub fn next_due_date(frequency: BillFrequency, due_date: Date) -> Result<Option<Date>, Error> {
    let next = match frequency {
        BillFrequency::Once => return Ok(None),
        BillFrequency::Weekly => due_date.checked_add(Duration::weeks(1)),
        BillFrequency::Monthly => add_months(due_date, 1),
        BillFrequency::Yearly => add_year(due_date),
    };

    next.map(Some).ok_or(Error::DateOutOfRange(due_date))
}

/// A reminder about a bill that needs attention.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillNotification {
    pub bill_id: BillId,
    pub title: String,
    pub body: String,
    pub due_date: Date,
    pub days_until_due: i64,
    pub status: BillStatus,
}

/// The reminder for `bill` as of `today`, if it is overdue, due today or due soon.
pub fn notification_for(bill: &Bill, today: Date) -> Option<BillNotification> {
    let status = bill_status(bill, today);
    let days = days_until_due(bill, today);
    let amount = format_rupiah(bill.amount);
    let name = &bill.name;

    let (title, body) = match status {
        BillStatus::Overdue => (
            format!("Tagihan terlambat: {name}"),
            format!(
                "{name} sebesar {amount} sudah lewat {} hari dari jatuh tempo.",
                days.abs()
            ),
        ),
        BillStatus::DueToday => (
            format!("Jatuh tempo hari ini: {name}"),
            format!("{name} sebesar {amount} harus dibayar hari ini."),
        ),
        BillStatus::DueSoon => (
            format!("Segera jatuh tempo: {name}"),
            format!("{name} sebesar {amount} jatuh tempo dalam {days} hari."),
        ),
        BillStatus::Paid | BillStatus::Upcoming => return None,
    };

    Some(BillNotification {
        bill_id: bill.id,
        title,
        body,
        due_date: bill.due_date,
        days_until_due: days,
        status,
    })
}

/// The reminders for `bills` as of `today`, most urgent first.
pub fn build_notifications(bills: &[Bill], today: Date) -> Vec<BillNotification> {
    let mut notifications: Vec<_> = bills
        .iter()
        .filter_map(|bill| notification_for(bill, today))
        .collect();

    notifications.sort_by_key(|notification| (notification.days_until_due, notification.bill_id));

    notifications
}

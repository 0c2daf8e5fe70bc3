//! Bill reminders: recurring or one-off payments with due dates.

mod core;
mod due;
mod handlers;

pub use core::{
    Bill, BillForm, BillId, BillPayment, BillView, NewBill, create_bill, delete_bill, get_bill,
    get_bills, get_unpaid_bills, pay_bill, update_bill,
};
pub use due::{
    BillFrequency, BillNotification, BillStatus, bill_status, build_notifications,
    days_until_due, next_due_date,
};
pub use handlers::{
    bill_notifications_endpoint, create_bill_endpoint, delete_bill_endpoint, get_bill_endpoint,
    list_bills_endpoint, pay_bill_endpoint, update_bill_endpoint,
};

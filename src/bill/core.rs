//! Bill reminders and the database functions for them.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    bill::{BillFrequency, BillStatus, bill_status, days_until_due, next_due_date},
    category::{CategoryId, TransactionKind, get_category},
    database_id::DatabaseId,
    name::Name,
    transaction::{Transaction, create_transaction},
    wallet::{WalletId, get_wallet},
};

pub type BillId = DatabaseId;

/// The largest accepted `remind_days_before`.
pub const MAX_REMIND_DAYS: u32 = 30;

const DEFAULT_REMIND_DAYS: u32 = 3;

/// A bill the user has to pay once or on a schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bill {
    pub id: BillId,
    pub user_id: UserID,
    pub name: Name,
    pub amount: f64,
    /// The next date the bill has to be paid by.
    pub due_date: Date,
    pub frequency: BillFrequency,
    /// How many days before the due date reminders start.
    pub remind_days_before: u32,
    /// The wallet the bill is paid from, used when recording payments.
    pub wallet_id: Option<WalletId>,
    pub category_id: Option<CategoryId>,
    /// Only one-off bills are ever marked paid, recurring bills move their
    /// due date forward instead.
    pub is_paid: bool,
    pub last_paid_date: Option<Date>,
}

/// A bill with its status as of today.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillView {
    #[serde(flatten)]
    pub bill: Bill,
    pub status: BillStatus,
    pub days_until_due: i64,
}

impl BillView {
    pub fn new(bill: Bill, today: Date) -> Self {
        Self {
            status: bill_status(&bill, today),
            days_until_due: days_until_due(&bill, today),
            bill,
        }
    }
}

fn default_remind_days() -> u32 {
    DEFAULT_REMIND_DAYS
}

/// The request body for creating or updating a bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillForm {
    pub name: String,
    pub amount: f64,
    pub due_date: Date,
    pub frequency: BillFrequency,
    #[serde(default = "default_remind_days")]
    pub remind_days_before: u32,
    #[serde(default)]
    pub wallet_id: Option<WalletId>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// The checked fields of a bill.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub name: Name,
    pub amount: f64,
    pub due_date: Date,
    pub frequency: BillFrequency,
    pub remind_days_before: u32,
    pub wallet_id: Option<WalletId>,
    pub category_id: Option<CategoryId>,
}

impl BillForm {
    /// Check the form against the user's wallets and categories.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyName] or [Error::NameTooLong] for a bad name,
    /// - [Error::NonPositiveAmount] if `amount` is not a finite number above zero,
    /// - [Error::InvalidReminderDays] if `remind_days_before` is above [MAX_REMIND_DAYS],
    /// - [Error::DateOutOfRange] if a recurring bill has no representable next due date,
    /// - [Error::InvalidWallet] or [Error::InvalidCategory] for IDs the user does not own,
    /// - [Error::CategoryKindMismatch] if the category is for income.
    pub fn validate(self, user_id: UserID, connection: &Connection) -> Result<NewBill, Error> {
        let name = Name::new(&self.name)?;

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if self.remind_days_before > MAX_REMIND_DAYS {
            return Err(Error::InvalidReminderDays {
                got: self.remind_days_before,
                max: MAX_REMIND_DAYS,
            });
        }

        // Paying the bill moves it to the next due date, which has to exist.
        next_due_date(self.frequency, self.due_date)?;

        if let Some(wallet_id) = self.wallet_id {
            match get_wallet(wallet_id, user_id, connection) {
                Ok(_) => {}
                Err(Error::NotFound) => return Err(Error::InvalidWallet(wallet_id)),
                Err(error) => return Err(error),
            }
        }

        if let Some(category_id) = self.category_id {
            let category = match get_category(category_id, user_id, connection) {
                Ok(category) => category,
                Err(Error::NotFound) => return Err(Error::InvalidCategory(category_id)),
                Err(error) => return Err(error),
            };

            if category.kind != TransactionKind::Expense {
                return Err(Error::CategoryKindMismatch {
                    expected: TransactionKind::Expense,
                    actual: category.kind,
                });
            }
        }

        Ok(NewBill {
            name,
            amount: self.amount,
            due_date: self.due_date,
            frequency: self.frequency,
            remind_days_before: self.remind_days_before,
            wallet_id: self.wallet_id,
            category_id: self.category_id,
        })
    }
}

const BILL_COLUMNS: &str = "id, user_id, name, amount, due_date, frequency, remind_days_before, \
    wallet_id, category_id, is_paid, last_paid_date";

fn map_bill_row(row: &Row) -> Result<Bill, rusqlite::Error> {
    let raw_name: String = row.get(2)?;

    Ok(Bill {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: Name::new_unchecked(&raw_name),
        amount: row.get(3)?,
        due_date: row.get(4)?,
        frequency: row.get(5)?,
        remind_days_before: row.get(6)?,
        wallet_id: row.get(7)?,
        category_id: row.get(8)?,
        is_paid: row.get(9)?,
        last_paid_date: row.get(10)?,
    })
}

/// Create a new, unpaid bill.
pub fn create_bill(user_id: UserID, bill: NewBill, connection: &Connection) -> Result<Bill, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO bill (user_id, name, amount, due_date, frequency, remind_days_before, wallet_id, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {BILL_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                bill.name.as_ref(),
                bill.amount,
                bill.due_date,
                bill.frequency,
                bill.remind_days_before,
                bill.wallet_id,
                bill.category_id,
            ),
            map_bill_row,
        )
        .map_err(|error| error.into())
}

/// Get a bill owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the bill does not exist or belongs to
/// another user.
pub fn get_bill(id: BillId, user_id: UserID, connection: &Connection) -> Result<Bill, Error> {
    connection
        .prepare(&format!(
            "SELECT {BILL_COLUMNS} FROM bill WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, user_id.as_i64()), map_bill_row)
        .map_err(|error| error.into())
}

/// Get the user's bills ordered by due date.
pub fn get_bills(user_id: UserID, connection: &Connection) -> Result<Vec<Bill>, Error> {
    connection
        .prepare(&format!(
            "SELECT {BILL_COLUMNS} FROM bill WHERE user_id = ?1 ORDER BY due_date ASC, id ASC"
        ))?
        .query_map([user_id.as_i64()], map_bill_row)?
        .map(|maybe_bill| maybe_bill.map_err(|error| error.into()))
        .collect()
}

/// Get the user's bills that still need paying, ordered by due date.
pub fn get_unpaid_bills(user_id: UserID, connection: &Connection) -> Result<Vec<Bill>, Error> {
    connection
        .prepare(&format!(
            "SELECT {BILL_COLUMNS} FROM bill
             WHERE user_id = ?1 AND is_paid = 0
             ORDER BY due_date ASC, id ASC"
        ))?
        .query_map([user_id.as_i64()], map_bill_row)?
        .map(|maybe_bill| maybe_bill.map_err(|error| error.into()))
        .collect()
}

/// Replace the editable fields of a bill. The paid state is left alone.
pub fn update_bill(
    id: BillId,
    user_id: UserID,
    bill: NewBill,
    connection: &Connection,
) -> Result<Bill, Error> {
    connection
        .prepare(&format!(
            "UPDATE bill
             SET name = ?1, amount = ?2, due_date = ?3, frequency = ?4,
                 remind_days_before = ?5, wallet_id = ?6, category_id = ?7
             WHERE id = ?8 AND user_id = ?9
             RETURNING {BILL_COLUMNS}"
        ))?
        .query_row(
            (
                bill.name.as_ref(),
                bill.amount,
                bill.due_date,
                bill.frequency,
                bill.remind_days_before,
                bill.wallet_id,
                bill.category_id,
                id,
                user_id.as_i64(),
            ),
            map_bill_row,
        )
        .map_err(|error| error.into())
}

/// Delete a bill owned by `user_id`.
pub fn delete_bill(id: BillId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM bill WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// The result of paying a bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillPayment {
    pub bill: Bill,
    /// The expense recorded for the payment, if one was requested and the
    /// bill has a wallet.
    pub transaction: Option<Transaction>,
}

/// Mark a bill as paid on `today`.
///
/// Recurring bills move on to their next due date and stay unpaid, one-off
/// bills are marked paid. When `record_transaction` is set and the bill has a
/// wallet, an expense for the bill amount is recorded in the same SQL
/// transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the bill does not belong to `user_id`,
/// - [Error::BillAlreadyPaid] if a one-off bill has already been paid,
/// - [Error::DateOutOfRange] if the next due date cannot be represented,
/// - or an error from recording the expense, in which case nothing is changed.
pub fn pay_bill(
    id: BillId,
    user_id: UserID,
    record_transaction: bool,
    today: Date,
    connection: &Connection,
) -> Result<BillPayment, Error> {
    let sql_transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let bill = get_bill(id, user_id, &sql_transaction)?;

    if bill.is_paid {
        return Err(Error::BillAlreadyPaid);
    }

    let (due_date, is_paid) = match next_due_date(bill.frequency, bill.due_date)? {
        Some(next) => (next, false),
        None => (bill.due_date, true),
    };

    let updated_bill = sql_transaction
        .prepare(&format!(
            "UPDATE bill SET due_date = ?1, is_paid = ?2, last_paid_date = ?3
             WHERE id = ?4 AND user_id = ?5
             RETURNING {BILL_COLUMNS}"
        ))?
        .query_row(
            (due_date, is_paid, today, id, user_id.as_i64()),
            map_bill_row,
        )?;

    let transaction = match (record_transaction, bill.wallet_id) {
        (true, Some(wallet_id)) => {
            let builder =
                Transaction::build(wallet_id, TransactionKind::Expense, bill.amount, today)
                    .category_id(bill.category_id)
                    .note(bill.name.as_ref())
                    .validate(user_id, today, &sql_transaction)?;

            Some(create_transaction(user_id, builder, &sql_transaction)?)
        }
        _ => None,
    };

    sql_transaction.commit()?;

    Ok(BillPayment {
        bill: updated_bill,
        transaction,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::{User, UserID},
        bill::BillFrequency,
        name::Name,
        pagination::Page,
        test_utils::{create_test_user, get_test_connection},
        transaction::{TransactionFilter, query_transactions},
        wallet::{Wallet, insert_test_wallet},
    };

    use super::{BillForm, NewBill, create_bill, get_bills, get_unpaid_bills, pay_bill};

    fn setup() -> (Connection, User, Wallet) {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let wallet = insert_test_wallet("BCA", 0.0, user.id, &connection);

        (connection, user, wallet)
    }

    fn new_bill(frequency: BillFrequency, due_date: time::Date, wallet_id: Option<i64>) -> NewBill {
        NewBill {
            name: Name::new_unchecked("Internet"),
            amount: 300_000.0,
            due_date,
            frequency,
            remind_days_before: 3,
            wallet_id,
            category_id: None,
        }
    }

    fn form(remind_days_before: u32, amount: f64) -> BillForm {
        BillForm {
            name: "Internet".to_owned(),
            amount,
            due_date: date!(2026 - 10 - 20),
            frequency: BillFrequency::Monthly,
            remind_days_before,
            wallet_id: None,
            category_id: None,
        }
    }

    #[test]
    fn validate_checks_reminder_days_and_amount() {
        let (connection, user, _) = setup();

        assert!(form(30, 10.0).validate(user.id, &connection).is_ok());
        assert_eq!(
            form(31, 10.0).validate(user.id, &connection),
            Err(Error::InvalidReminderDays { got: 31, max: 30 })
        );
        assert_eq!(
            form(3, -10.0).validate(user.id, &connection),
            Err(Error::NonPositiveAmount(-10.0))
        );
    }

    #[test]
    fn validate_rejects_due_date_without_a_next_one() {
        let (connection, user, _) = setup();
        let mut weekly = form(3, 10.0);
        weekly.frequency = BillFrequency::Weekly;
        weekly.due_date = date!(9999 - 12 - 28);
        let mut once = weekly.clone();
        once.frequency = BillFrequency::Once;

        assert_eq!(
            weekly.validate(user.id, &connection),
            Err(Error::DateOutOfRange(date!(9999 - 12 - 28)))
        );
        assert!(once.validate(user.id, &connection).is_ok());
    }

    #[test]
    fn paying_bill_without_next_due_date_changes_nothing() {
        let (connection, user, wallet) = setup();
        let bill = create_bill(
            user.id,
            new_bill(BillFrequency::Yearly, date!(9999 - 03 - 01), Some(wallet.id)),
            &connection,
        )
        .unwrap();

        assert_eq!(
            pay_bill(bill.id, user.id, true, date!(2026 - 03 - 01), &connection),
            Err(Error::DateOutOfRange(date!(9999 - 03 - 01)))
        );

        assert_eq!(get_unpaid_bills(user.id, &connection).unwrap(), vec![bill]);
        let (transactions, _) = query_transactions(
            user.id,
            &TransactionFilter::default(),
            Page {
                page: 1,
                per_page: 10,
            },
            &connection,
        )
        .unwrap();
        assert!(transactions.is_empty());
    }

    #[test]
    fn reminder_days_default_to_three() {
        let form: BillForm = serde_json::from_str(
            r#"{"name": "Air", "amount": 50000, "due_date": "2026-10-20", "frequency": "monthly"}"#,
        )
        .unwrap();

        assert_eq!(form.remind_days_before, 3);
    }

    #[test]
    fn paying_monthly_bill_moves_due_date() {
        let (connection, user, _) = setup();
        let bill = create_bill(
            user.id,
            new_bill(BillFrequency::Monthly, date!(2026 - 01 - 31), None),
            &connection,
        )
        .unwrap();

        let paid = pay_bill(bill.id, user.id, false, date!(2026 - 01 - 30), &connection).unwrap();

        assert_eq!(paid.bill.due_date, date!(2026 - 02 - 28));
        assert!(!paid.bill.is_paid);
        assert_eq!(paid.bill.last_paid_date, Some(date!(2026 - 01 - 30)));
        assert_eq!(paid.transaction, None);
    }

    #[test]
    fn one_off_bill_can_only_be_paid_once() {
        let (connection, user, _) = setup();
        let bill = create_bill(
            user.id,
            new_bill(BillFrequency::Once, date!(2026 - 03 - 01), None),
            &connection,
        )
        .unwrap();

        let paid = pay_bill(bill.id, user.id, false, date!(2026 - 03 - 01), &connection).unwrap();
        assert!(paid.bill.is_paid);
        assert_eq!(paid.bill.due_date, date!(2026 - 03 - 01));

        assert_eq!(
            pay_bill(bill.id, user.id, false, date!(2026 - 03 - 02), &connection),
            Err(Error::BillAlreadyPaid)
        );
        assert!(get_unpaid_bills(user.id, &connection).unwrap().is_empty());
        assert_eq!(get_bills(user.id, &connection).unwrap().len(), 1);
    }

    #[test]
    fn paying_with_record_transaction_adds_expense() {
        let (connection, user, wallet) = setup();
        let bill = create_bill(
            user.id,
            new_bill(BillFrequency::Weekly, date!(2026 - 03 - 01), Some(wallet.id)),
            &connection,
        )
        .unwrap();

        let paid = pay_bill(bill.id, user.id, true, date!(2026 - 03 - 02), &connection).unwrap();

        let transaction = paid.transaction.unwrap();
        assert_eq!(transaction.amount, 300_000.0);
        assert_eq!(transaction.wallet_id, wallet.id);
        assert_eq!(transaction.note, "Internet");
        assert_eq!(transaction.date, date!(2026 - 03 - 02));
        assert_eq!(paid.bill.due_date, date!(2026 - 03 - 08));
    }

    #[test]
    fn record_transaction_without_wallet_only_pays() {
        let (connection, user, _) = setup();
        let bill = create_bill(
            user.id,
            new_bill(BillFrequency::Monthly, date!(2026 - 03 - 01), None),
            &connection,
        )
        .unwrap();

        let paid = pay_bill(bill.id, user.id, true, date!(2026 - 03 - 01), &connection).unwrap();

        assert_eq!(paid.transaction, None);
        let (transactions, _) = query_transactions(
            user.id,
            &TransactionFilter::default(),
            Page {
                page: 1,
                per_page: 10,
            },
            &connection,
        )
        .unwrap();
        assert!(transactions.is_empty());
    }

    #[test]
    fn paying_other_users_bill_is_not_found() {
        let (connection, user, _) = setup();
        let bill = create_bill(
            user.id,
            new_bill(BillFrequency::Monthly, date!(2026 - 03 - 01), None),
            &connection,
        )
        .unwrap();

        assert_eq!(
            pay_bill(
                bill.id,
                UserID::new(user.id.as_i64() + 1),
                false,
                date!(2026 - 03 - 01),
                &connection
            ),
            Err(Error::NotFound)
        );
    }
}

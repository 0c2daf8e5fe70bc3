//! Sample data for trying out the API by hand.

use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use crate::{
    Error,
    auth::UserID,
    bill::{BillFrequency, NewBill, create_bill},
    budget::{BudgetForm, BudgetPeriod, create_budget},
    category::{Category, DEFAULT_CATEGORIES, TransactionKind, add_default_categories},
    goal::{NewGoal, create_goal},
    name::Name,
    transaction::{Transaction, create_transaction},
    wallet::{WalletForm, WalletKind, create_wallet},
};

/// The number of days of transactions created by [populate_demo_data].
const DEMO_DAYS: i64 = 30;

/// Give `user_id` default categories, two wallets, a month of transactions
/// ending on `today`, a monthly food budget, a savings goal and two bills.
///
/// # Errors
/// Returns an error if any of the rows cannot be inserted.
pub fn populate_demo_data(user_id: UserID, today: Date, connection: &Connection) -> Result<(), Error> {
    let now = OffsetDateTime::now_utc();
    let categories = add_default_categories(user_id, DEFAULT_CATEGORIES, connection)?;
    let category = |name: &str, kind: TransactionKind| {
        categories
            .iter()
            .find(|category: &&Category| category.name.as_ref() == name && category.kind == kind)
            .map(|category| category.id)
    };
    let salary = category("Gaji", TransactionKind::Income);
    let food = category("Makan & Minum", TransactionKind::Expense);
    let transport = category("Transportasi", TransactionKind::Expense);
    let bills = category("Tagihan", TransactionKind::Expense);

    let bank = create_wallet(
        user_id,
        &WalletForm {
            name: "BCA".to_owned(),
            kind: WalletKind::Bank,
            initial_balance: 2_500_000.0,
        },
        now,
        connection,
    )?;
    let cash = create_wallet(
        user_id,
        &WalletForm {
            name: "Dompet".to_owned(),
            kind: WalletKind::Cash,
            initial_balance: 300_000.0,
        },
        now,
        connection,
    )?;

    let first_day = today - Duration::days(DEMO_DAYS - 1);
    create_transaction(
        user_id,
        Transaction::build(bank.id, TransactionKind::Income, 8_000_000.0, first_day)
            .category_id(salary)
            .note("Gaji bulanan"),
        connection,
    )?;

    for offset in 0..DEMO_DAYS {
        let date = first_day + Duration::days(offset);
        // Vary the amounts so the charts are not flat.
        let lunch = 25_000.0 + (offset % 4) as f64 * 5_000.0;
        create_transaction(
            user_id,
            Transaction::build(cash.id, TransactionKind::Expense, lunch, date)
                .category_id(food)
                .note("Makan siang"),
            connection,
        )?;

        if offset % 3 == 0 {
            create_transaction(
                user_id,
                Transaction::build(bank.id, TransactionKind::Expense, 18_000.0, date)
                    .category_id(transport)
                    .note("Ojek online"),
                connection,
            )?;
        }
    }

    create_transaction(
        user_id,
        Transaction::build(bank.id, TransactionKind::Expense, 350_000.0, first_day)
            .category_id(bills)
            .note("Internet"),
        connection,
    )?;

    if let Some(food) = food {
        create_budget(
            user_id,
            &BudgetForm {
                wallet_id: cash.id,
                category_id: Some(food),
                amount: 1_000_000.0,
                period: BudgetPeriod::Monthly,
                start_date: first_day,
            },
            connection,
        )?;
    }

    create_goal(
        user_id,
        NewGoal {
            name: Name::new_unchecked("Dana darurat"),
            target_amount: 20_000_000.0,
            current_amount: 4_500_000.0,
            deadline: Some(today + Duration::days(365)),
        },
        now,
        connection,
    )?;

    for (name, amount, due_in, frequency) in [
        ("Internet", 350_000.0, 2, BillFrequency::Monthly),
        ("Asuransi kendaraan", 1_200_000.0, 45, BillFrequency::Yearly),
    ] {
        create_bill(
            user_id,
            NewBill {
                name: Name::new_unchecked(name),
                amount,
                due_date: today + Duration::days(due_in),
                frequency,
                remind_days_before: 3,
                wallet_id: Some(bank.id),
                category_id: bills,
            },
            connection,
        )?;
    }

    tracing::info!("Created demo data for user {user_id}");

    Ok(())
}

//! Database queries for filtered, paged and exported transaction lists.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    category::{CategoryId, TransactionKind},
    pagination::Page,
    wallet::WalletId,
};

use super::core::{Transaction, map_transaction_row};

/// Optional filters for listing transactions. Every filter that is set must
/// match.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub wallet_id: Option<WalletId>,
    pub category_id: Option<CategoryId>,
    pub kind: Option<TransactionKind>,
    /// The earliest date to include.
    pub from: Option<Date>,
    /// The latest date to include.
    pub to: Option<Date>,
}

impl TransactionFilter {
    /// Build the `WHERE` clause and its parameters for the filter, always
    /// scoped to `user_id`.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if `from` is after `to`.
    fn where_clause(&self, user_id: UserID) -> Result<(String, Vec<Value>), Error> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(Error::InvalidDateRange(from, to));
        }

        let mut conditions = vec!["t.user_id = ?".to_owned()];
        let mut params = vec![Value::Integer(user_id.as_i64())];

        if let Some(wallet_id) = self.wallet_id {
            conditions.push("t.wallet_id = ?".to_owned());
            params.push(Value::Integer(wallet_id));
        }
        if let Some(category_id) = self.category_id {
            conditions.push("t.category_id = ?".to_owned());
            params.push(Value::Integer(category_id));
        }
        if let Some(kind) = self.kind {
            conditions.push("t.kind = ?".to_owned());
            params.push(Value::Text(kind.as_str().to_owned()));
        }
        if let Some(from) = self.from {
            conditions.push("t.date >= ?".to_owned());
            params.push(Value::Text(from.to_string()));
        }
        if let Some(to) = self.to {
            conditions.push("t.date <= ?".to_owned());
            params.push(Value::Text(to.to_string()));
        }

        Ok((format!("WHERE {}", conditions.join(" AND ")), params))
    }
}

/// Get one page of the user's transactions matching `filter` and the total
/// number of matching transactions.
///
/// Transactions are ordered newest first, with the ID breaking ties so the
/// order stays stable after edits.
///
/// # Errors
/// Returns [Error::InvalidDateRange] for an inverted date range or
/// [Error::SqlError] if the query fails.
pub fn query_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    page: Page,
    connection: &Connection,
) -> Result<(Vec<Transaction>, u64), Error> {
    let (where_clause, params) = filter.where_clause(user_id)?;

    let total_count: i64 = connection.query_row(
        &format!("SELECT COUNT(*) FROM \"transaction\" t {where_clause}"),
        params_from_iter(params.iter()),
        |row| row.get(0),
    )?;

    let query = format!(
        "SELECT t.id, t.user_id, t.wallet_id, t.category_id, t.kind, t.amount, t.date, t.note
         FROM \"transaction\" t
         {where_clause}
         ORDER BY t.date DESC, t.id DESC
         LIMIT {} OFFSET {}",
        page.limit(),
        page.offset()
    );

    let transactions = connection
        .prepare(&query)?
        .query_map(params_from_iter(params.iter()), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((transactions, u64::try_from(total_count).unwrap_or_default()))
}

/// A transaction with its wallet and category names, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub date: Date,
    pub kind: TransactionKind,
    pub amount: f64,
    pub wallet: String,
    pub category: String,
    pub note: String,
}

/// Get every transaction matching `filter` with wallet and category names,
/// newest first.
///
/// Uncategorised transactions have an empty category name.
pub fn query_export_rows(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<ExportRow>, Error> {
    let (where_clause, params) = filter.where_clause(user_id)?;

    let query = format!(
        "SELECT t.date, t.kind, t.amount, w.name, COALESCE(c.name, ''), t.note
         FROM \"transaction\" t
         INNER JOIN wallet w ON w.id = t.wallet_id
         LEFT JOIN category c ON c.id = t.category_id
         {where_clause}
         ORDER BY t.date DESC, t.id DESC"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params.iter()), |row| {
            Ok(ExportRow {
                date: row.get(0)?,
                kind: row.get(1)?,
                amount: row.get(2)?,
                wallet: row.get(3)?,
                category: row.get(4)?,
                note: row.get(5)?,
            })
        })?
        .map(|row_result| row_result.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Duration, macros::date};

    use crate::{
        Error,
        auth::{User, UserID},
        category::{NewCategory, TransactionKind, create_category},
        name::Name,
        pagination::Page,
        test_utils::{create_test_user, get_test_connection},
        transaction::{Transaction, create_transaction},
        wallet::{Wallet, insert_test_wallet},
    };

    use super::{TransactionFilter, query_export_rows, query_transactions};

    const FIRST_PAGE: Page = Page {
        page: 1,
        per_page: 20,
    };

    fn setup() -> (Connection, User, Wallet) {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let wallet = insert_test_wallet("BCA", 0.0, user.id, &connection);

        (connection, user, wallet)
    }

    #[test]
    fn orders_newest_first_with_stable_ties() {
        let (connection, user, wallet) = setup();
        let today = date!(2026 - 10 - 10);
        let mut ids = Vec::new();
        for i in 0..4 {
            let date = if i < 2 { today } else { today - Duration::days(1) };
            let transaction = create_transaction(
                user.id,
                Transaction::build(wallet.id, TransactionKind::Expense, 1.0 + i as f64, date),
                &connection,
            )
            .unwrap();
            ids.push(transaction.id);
        }

        let (got, total) = query_transactions(
            user.id,
            &TransactionFilter::default(),
            FIRST_PAGE,
            &connection,
        )
        .unwrap();

        let got_ids: Vec<_> = got.iter().map(|transaction| transaction.id).collect();
        assert_eq!(got_ids, vec![ids[1], ids[0], ids[3], ids[2]]);
        assert_eq!(total, 4);
    }

    #[test]
    fn pages_report_total_count() {
        let (connection, user, wallet) = setup();
        for day in 1..=5 {
            create_transaction(
                user.id,
                Transaction::build(
                    wallet.id,
                    TransactionKind::Expense,
                    10.0,
                    date!(2026 - 10 - 01) + Duration::days(day),
                ),
                &connection,
            )
            .unwrap();
        }

        let (got, total) = query_transactions(
            user.id,
            &TransactionFilter::default(),
            Page {
                page: 2,
                per_page: 2,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(total, 5);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].date, date!(2026 - 10 - 04));
    }

    #[test]
    fn filters_combine() {
        let (connection, user, wallet) = setup();
        let other_wallet = insert_test_wallet("Dompet", 0.0, user.id, &connection);
        let food = create_category(
            user.id,
            NewCategory {
                name: Name::new_unchecked("Makan"),
                kind: TransactionKind::Expense,
                icon: None,
                color: None,
            },
            &connection,
        )
        .unwrap();
        let want = create_transaction(
            user.id,
            Transaction::build(wallet.id, TransactionKind::Expense, 5.0, date!(2026 - 10 - 05))
                .category_id(Some(food.id)),
            &connection,
        )
        .unwrap();
        for builder in [
            Transaction::build(wallet.id, TransactionKind::Expense, 5.0, date!(2026 - 09 - 05))
                .category_id(Some(food.id)),
            Transaction::build(other_wallet.id, TransactionKind::Expense, 5.0, date!(2026 - 10 - 05))
                .category_id(Some(food.id)),
            Transaction::build(wallet.id, TransactionKind::Income, 5.0, date!(2026 - 10 - 05)),
        ] {
            create_transaction(user.id, builder, &connection).unwrap();
        }

        let filter = TransactionFilter {
            wallet_id: Some(wallet.id),
            category_id: Some(food.id),
            kind: Some(TransactionKind::Expense),
            from: Some(date!(2026 - 10 - 01)),
            to: Some(date!(2026 - 10 - 31)),
        };
        let (got, total) = query_transactions(user.id, &filter, FIRST_PAGE, &connection).unwrap();

        assert_eq!(got, vec![want]);
        assert_eq!(total, 1);
    }

    #[test]
    fn other_users_transactions_are_hidden() {
        let (connection, user, wallet) = setup();
        create_transaction(
            user.id,
            Transaction::build(wallet.id, TransactionKind::Expense, 5.0, date!(2026 - 10 - 05)),
            &connection,
        )
        .unwrap();

        let (got, total) = query_transactions(
            UserID::new(user.id.as_i64() + 1),
            &TransactionFilter::default(),
            FIRST_PAGE,
            &connection,
        )
        .unwrap();

        assert!(got.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let (connection, user, _) = setup();
        let filter = TransactionFilter {
            from: Some(date!(2026 - 10 - 05)),
            to: Some(date!(2026 - 10 - 01)),
            ..Default::default()
        };

        assert_eq!(
            query_transactions(user.id, &filter, FIRST_PAGE, &connection),
            Err(Error::InvalidDateRange(
                date!(2026 - 10 - 05),
                date!(2026 - 10 - 01)
            ))
        );
    }

    #[test]
    fn export_rows_include_names() {
        let (connection, user, wallet) = setup();
        create_transaction(
            user.id,
            Transaction::build(wallet.id, TransactionKind::Income, 100.0, date!(2026 - 10 - 05))
                .note("Gaji"),
            &connection,
        )
        .unwrap();

        let rows = query_export_rows(user.id, &TransactionFilter::default(), &connection).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].wallet, "BCA");
        assert_eq!(rows[0].category, "");
        assert_eq!(rows[0].note, "Gaji");
    }
}

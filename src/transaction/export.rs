//! Exports transactions as a CSV download.

use axum::{
    Extension,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use crate::{
    Error,
    app_state::lock_connection,
    auth::UserID,
    transaction::query_export_rows,
};

use super::{
    list_endpoint::{ListTransactionsState, TransactionListQuery},
    query::ExportRow,
};

/// Respond with every transaction matching the filters as CSV.
///
/// Paging parameters are ignored.
pub async fn export_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionListQuery>,
) -> Result<impl IntoResponse, Error> {
    let rows = {
        let connection = lock_connection(&state.db_connection)?;
        query_export_rows(user_id, &query.filter(), &connection)?
    };

    let body = write_csv(&rows)?;
    tracing::debug!("Exported {} transactions for user {user_id}", rows.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        body,
    ))
}

/// Write `rows` as CSV with a header row.
///
/// The header is written even when there are no rows.
fn write_csv(rows: &[ExportRow]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if rows.is_empty() {
        writer
            .write_record(["date", "kind", "amount", "wallet", "category", "note"])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    for row in rows {
        writer
            .serialize(row)
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        category::TransactionKind,
        endpoints,
        test_utils::{assert_content_type, logged_in_server},
        transaction::{Transaction, create_transaction},
        wallet::insert_test_wallet,
    };

    use super::{ExportRow, write_csv};

    #[test]
    fn empty_export_has_header() {
        assert_eq!(
            write_csv(&[]).unwrap(),
            "date,kind,amount,wallet,category,note\n"
        );
    }

    #[test]
    fn notes_with_commas_are_quoted() {
        let rows = [ExportRow {
            date: date!(2026 - 01 - 02),
            kind: TransactionKind::Expense,
            amount: 15_000.0,
            wallet: "Dompet".to_owned(),
            category: "Makan & Minum".to_owned(),
            note: "Soto, es teh".to_owned(),
        }];

        assert_eq!(
            write_csv(&rows).unwrap(),
            "date,kind,amount,wallet,category,note\n\
             2026-01-02,expense,15000.0,Dompet,Makan & Minum,\"Soto, es teh\"\n"
        );
    }

    #[tokio::test]
    async fn export_responds_with_csv() {
        let app = logged_in_server().await;
        {
            let connection = app.state.db_connection.lock().unwrap();
            let wallet = insert_test_wallet("BCA", 0.0, app.user.id, &connection);
            for (kind, day) in [
                (TransactionKind::Income, date!(2026 - 01 - 01)),
                (TransactionKind::Expense, date!(2026 - 01 - 02)),
            ] {
                create_transaction(
                    app.user.id,
                    Transaction::build(wallet.id, kind, 10.0, day),
                    &connection,
                )
                .unwrap();
            }
        }

        let response = app
            .server
            .get(endpoints::EXPORT_TRANSACTIONS)
            .add_query_param("kind", "expense")
            .await;

        response.assert_status_ok();
        assert_content_type(&response, "text/csv; charset=utf-8");
        response.assert_text(
            "date,kind,amount,wallet,category,note\n2026-01-02,expense,10.0,BCA,,\n",
        );
    }
}

//! Defines the endpoint for listing the transactions recorded today.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    db::acquire_connection,
    timezone::local_midnight,
    transaction::{Transaction, list_transactions_since},
};

/// The state needed to list today's transactions.
#[derive(Debug, Clone)]
pub struct TodaysTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TodaysTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The transactions recorded since local midnight.
#[derive(Debug, Serialize)]
pub struct TodaysTransactions {
    /// When the transactions were fetched.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// The transactions in the order they were recorded.
    pub transactions: Vec<Transaction>,
}

/// A route handler for listing the transactions recorded today, in the
/// server's local timezone.
pub async fn get_todays_transactions_endpoint(
    State(state): State<TodaysTransactionsState>,
) -> Result<Json<TodaysTransactions>, Error> {
    let now = OffsetDateTime::now_utc();
    let midnight = local_midnight(now, &state.local_timezone)?;

    let connection = acquire_connection(&state.db_connection)?;
    let transactions = list_transactions_since(midnight, &connection)?;

    Ok(Json(TodaysTransactions {
        date: now,
        transactions,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use time::{Duration, OffsetDateTime};

    use crate::{
        endpoints,
        test_utils::{get_test_server_with_balance, get_test_state},
        transaction::{Transaction, TransactionType, insert_transaction},
    };

    #[tokio::test]
    async fn lists_transactions_from_today() {
        let server = get_test_server_with_balance(100.0).await;
        server
            .post(endpoints::EXPENSE)
            .json(&json!({ "text": "Coffee", "value": 5 }))
            .await
            .assert_status_ok();
        server
            .post(endpoints::INCOME)
            .json(&json!({ "text": "Tips", "value": 3 }))
            .await
            .assert_status_ok();

        let response = server.get(endpoints::TRANSACTION).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert!(body["date"].is_string(), "got {body}");
        let transactions = body["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0]["text"], json!("coffee"));
        assert_eq!(transactions[1]["text"], json!("tips"));
    }

    #[tokio::test]
    async fn excludes_older_transactions() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_transaction(
                Transaction::build(TransactionType::Expense, "last week", 9.0)
                    .date(OffsetDateTime::now_utc() - Duration::days(7)),
                &connection,
            )
            .unwrap();
            insert_transaction(
                Transaction::build(TransactionType::Expense, "right now", 1.0),
                &connection,
            )
            .unwrap();
        }
        let server = axum_test::TestServer::try_new(crate::build_router(state))
            .expect("Could not create test server.");

        let body = server.get(endpoints::TRANSACTION).await.json::<Value>();

        let transactions = body["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 1, "got {transactions:?}");
        assert_eq!(transactions[0]["text"], json!("right now"));
    }
}

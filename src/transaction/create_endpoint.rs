//! Defines the endpoints for recording an expense or income.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    amount::parse_positive_amount,
    db::acquire_connection,
    extract::JsonBody,
    transaction::{TransactionType, record_transaction},
};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for recording an expense or income.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionRequest {
    /// What the money was spent on or earned from.
    pub text: Option<Value>,
    /// The amount of money, must be greater than zero.
    pub value: Option<Value>,
}

/// The response for a newly recorded transaction.
///
/// `text` is the description exactly as the client sent it, the stored copy
/// is lower case.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CreatedTransaction {
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Whether the transaction was an expense or income.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The description of the transaction.
    pub text: String,
    /// The amount of money.
    pub value: f64,
}

/// A route handler for recording an expense, which decreases the balance.
pub async fn create_expense_endpoint(
    State(state): State<CreateTransactionState>,
    JsonBody(request): JsonBody<TransactionRequest>,
) -> Result<Json<CreatedTransaction>, Error> {
    create_transaction(TransactionType::Expense, &state, request)
}

/// A route handler for recording income, which increases the balance.
pub async fn create_income_endpoint(
    State(state): State<CreateTransactionState>,
    JsonBody(request): JsonBody<TransactionRequest>,
) -> Result<Json<CreatedTransaction>, Error> {
    create_transaction(TransactionType::Income, &state, request)
}

fn create_transaction(
    kind: TransactionType,
    state: &CreateTransactionState,
    request: TransactionRequest,
) -> Result<Json<CreatedTransaction>, Error> {
    let (text, value) = validate_request(request)?;

    let mut connection = acquire_connection(&state.db_connection)?;
    let transaction = record_transaction(kind, &text, value, &mut connection)?;
    tracing::info!(
        "Recorded {kind} #{} for {value}: {}",
        transaction.id,
        transaction.text
    );

    Ok(Json(CreatedTransaction {
        date: transaction.date,
        kind: transaction.kind,
        text,
        value: transaction.value,
    }))
}

/// Check that the request has a non-blank text and a positive value.
fn validate_request(request: TransactionRequest) -> Result<(String, f64), Error> {
    let text = match request.text {
        Some(Value::String(text)) if !text.trim().is_empty() => text,
        _ => return Err(Error::InvalidTransactionFields),
    };

    let value = request
        .value
        .as_ref()
        .and_then(parse_positive_amount)
        .ok_or(Error::InvalidTransactionFields)?;

    Ok((text, value))
}


#[cfg(test)]
mod endpoint_tests {
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{get_test_server, get_test_server_with_balance},
        transaction::TransactionType,
    };

    use super::CreatedTransaction;

    #[tokio::test]
    async fn expense_decreases_balance() {
        let server = get_test_server_with_balance(100.0).await;

        let response = server
            .post(endpoints::EXPENSE)
            .json(&json!({ "text": "Coffee", "value": 5 }))
            .await;

        response.assert_status_ok();
        let created = response.json::<CreatedTransaction>();
        assert_eq!(created.kind, TransactionType::Expense);
        assert_eq!(created.text, "Coffee", "the response should keep the original case");
        assert_eq!(created.value, 5.0);
        server
            .get(endpoints::BALANCE)
            .await
            .assert_json(&json!({ "balance": 95.0 }));
    }

    #[tokio::test]
    async fn income_increases_balance() {
        let server = get_test_server_with_balance(100.0).await;

        let response = server
            .post(endpoints::INCOME)
            .json(&json!({ "text": "Salary", "value": "20.5" }))
            .await;

        response.assert_status_ok();
        let created = response.json::<CreatedTransaction>();
        assert_eq!(created.kind, TransactionType::Income);
        assert_eq!(created.text, "Salary");
        assert_eq!(created.value, 20.5);
        server
            .get(endpoints::BALANCE)
            .await
            .assert_json(&json!({ "balance": 120.5 }));
    }

    #[tokio::test]
    async fn response_has_expected_fields() {
        let server = get_test_server_with_balance(100.0).await;

        let body = server
            .post(endpoints::EXPENSE)
            .json(&json!({ "text": "Coffee", "value": 5 }))
            .await
            .json::<Value>();

        let mut keys = body.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        keys.sort();
        assert_eq!(keys, vec!["date", "text", "type", "value"]);
        assert_eq!(body["type"], json!("expense"));
    }

    #[tokio::test]
    async fn fails_without_initial_balance() {
        let server = get_test_server();

        for endpoint in [endpoints::EXPENSE, endpoints::INCOME] {
            let response = server
                .post(endpoint)
                .json(&json!({ "text": "Coffee", "value": 5 }))
                .await;

            response.assert_status_bad_request();
            response.assert_json(&json!({ "error": "Initial Balance Not Defined" }));
        }
    }

    #[tokio::test]
    async fn fails_on_invalid_fields() {
        let server = get_test_server_with_balance(100.0).await;

        for endpoint in [endpoints::EXPENSE, endpoints::INCOME] {
            for body in [
                json!({}),
                json!({ "text": "Coffee" }),
                json!({ "value": 5 }),
                json!({ "text": "Coffee", "value": 0 }),
                json!({ "text": "Coffee", "value": "five" }),
                json!({ "text": "", "value": 5 }),
            ] {
                let response = server.post(endpoint).json(&body).await;

                response.assert_status_bad_request();
                response.assert_json(&json!({ "error": "Missing or invalid required fields" }));
            }
        }

        server
            .get(endpoints::BALANCE)
            .await
            .assert_json(&json!({ "balance": 100.0 }));
    }

    #[tokio::test]
    async fn rejects_income_that_overflows_balance() {
        let server = get_test_server_with_balance(1e308).await;

        let response = server
            .post(endpoints::INCOME)
            .json(&json!({ "text": "Windfall", "value": 1e308 }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "Balance out of range" }));
        server
            .get(endpoints::BALANCE)
            .await
            .assert_json(&json!({ "balance": 1e308 }));
        server
            .get(endpoints::INCOME)
            .await
            .assert_json(&json!([]));
    }

    #[tokio::test]
    async fn validation_happens_before_balance_check() {
        let server = get_test_server();

        let response = server
            .post(endpoints::EXPENSE)
            .json(&json!({ "text": "Coffee" }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "Missing or invalid required fields" }));
    }
}

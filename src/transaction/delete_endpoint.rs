//! Defines the endpoint for deleting a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error, database_id::TransactionId, db::acquire_connection, extract::PathParam,
    transaction::remove_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, the balance is moved back by
/// the transaction's value.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    PathParam(transaction_id): PathParam<TransactionId>,
) -> Result<Json<Value>, Error> {
    let mut connection = acquire_connection(&state.db_connection)?;
    let transaction = remove_transaction(transaction_id, &mut connection)?;
    tracing::info!(
        "Deleted {} #{transaction_id} for {}",
        transaction.kind,
        transaction.value
    );

    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}

//! Defines the endpoint for wiping the ledger.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{AppState, Error, db::acquire_connection};

/// The state needed to reset the ledger.
#[derive(Debug, Clone)]
pub struct ResetLedgerState {
    /// The database connection for managing the balance and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ResetLedgerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting the balance and every transaction.
///
/// This cannot be undone.
pub async fn reset_ledger_endpoint(
    State(state): State<ResetLedgerState>,
) -> Result<Json<Value>, Error> {
    let mut connection = acquire_connection(&state.db_connection)?;
    let (balances, transactions) = reset_ledger(&mut connection)?;
    tracing::info!(
        "Reset the ledger, deleted {balances} balance(s) and {transactions} transaction(s)"
    );

    Ok(Json(json!({ "message": "Balance reset successfully" })))
}

type RowsAffected = usize;

/// Delete the balance and all transactions in a single database transaction.
///
/// Returns the number of balance rows and transaction rows deleted.
pub fn reset_ledger(connection: &mut Connection) -> Result<(RowsAffected, RowsAffected), Error> {
    let transaction = connection.transaction()?;

    let balances = transaction.execute("DELETE FROM balances", ())?;
    let transactions = transaction.execute("DELETE FROM transactions", ())?;

    transaction.commit()?;

    Ok((balances, transactions))
}

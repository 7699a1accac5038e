//! Defines the endpoints for listing expenses and income.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::acquire_connection,
    transaction::{Transaction, TransactionType, list_transactions_by_type},
};

/// The state needed to list transactions by type.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing every expense.
pub async fn list_expenses_endpoint(
    State(state): State<ListTransactionsState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    list_transactions(TransactionType::Expense, &state)
}

/// A route handler for listing all income.
pub async fn list_income_endpoint(
    State(state): State<ListTransactionsState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    list_transactions(TransactionType::Income, &state)
}

fn list_transactions(
    kind: TransactionType,
    state: &ListTransactionsState,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = acquire_connection(&state.db_connection)?;

    list_transactions_by_type(kind, &connection).map(Json)
}

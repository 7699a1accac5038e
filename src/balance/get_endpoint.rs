//! Defines the endpoint for getting the current balance.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    balance::{Balance, get_balance},
    db::acquire_connection,
};

/// The state needed to get the balance.
#[derive(Debug, Clone)]
pub struct GetBalanceState {
    /// The database connection for managing the balance.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetBalanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for getting the current balance.
pub async fn get_balance_endpoint(
    State(state): State<GetBalanceState>,
) -> Result<Json<Balance>, Error> {
    let connection = acquire_connection(&state.db_connection)?;

    get_balance(&connection).map(Json)
}

//! Defines the endpoint for setting the initial balance.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error, amount::parse_amount, balance::set_initial_balance, db::acquire_connection,
    extract::JsonBody,
};

/// The state needed to set the initial balance.
#[derive(Debug, Clone)]
pub struct CreateBalanceState {
    /// The database connection for managing the balance.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBalanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for setting the initial balance.
///
/// The balance is kept as a raw JSON value so that numeric strings are
/// accepted and anything else is reported as an invalid balance.
#[derive(Debug, Default, Deserialize)]
pub struct InitialBalanceRequest {
    /// The initial balance in dollars.
    pub balance: Option<Value>,
}

/// A route handler for setting the initial balance.
///
/// The initial balance may be any finite number, including zero.
pub async fn create_balance_endpoint(
    State(state): State<CreateBalanceState>,
    JsonBody(request): JsonBody<InitialBalanceRequest>,
) -> Result<Json<Value>, Error> {
    let amount = request
        .balance
        .as_ref()
        .and_then(parse_amount)
        .ok_or(Error::InvalidBalance)?;

    let mut connection = acquire_connection(&state.db_connection)?;
    set_initial_balance(amount, &mut connection)?;
    tracing::info!("Set the initial balance to {amount}");

    Ok(Json(json!({ "message": "Initial balance added successfully" })))
}

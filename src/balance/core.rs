//! Defines the balance model and its database queries.

use rusqlite::{Connection, Row, params};
use serde::Serialize;

use crate::{Error, database_id::DatabaseId};

/// The ID of the one and only balance row.
const BALANCE_ID: DatabaseId = 1;

/// The amount of money currently available.
///
/// There is at most one balance. If it does not exist, the ledger has not
/// been initialised yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    /// The id for the balance.
    #[serde(skip_serializing)]
    pub id: DatabaseId,
    /// The balance.
    pub balance: f64,
}

/// Create the balance table in the database.
///
/// The `CHECK` constraint on the ID guarantees that there can never be more
/// than one balance.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_balance_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS balances (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            balance REAL NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Balance].
pub fn map_row_to_balance(row: &Row) -> Result<Balance, rusqlite::Error> {
    let id = row.get(0)?;
    let balance = row.get(1)?;

    Ok(Balance { id, balance })
}

/// Get the current balance.
///
/// # Errors
/// This function will return a:
/// - [Error::BalanceNotDefined] if the initial balance has not been set,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_balance(connection: &Connection) -> Result<Balance, Error> {
    connection
        .query_row(
            "SELECT id, balance FROM balances LIMIT 1",
            [],
            map_row_to_balance,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::BalanceNotDefined,
            error => error.into(),
        })
}

/// Insert the initial balance.
///
/// Callers should use [set_initial_balance] which checks for an existing
/// balance in the same database transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::BalanceAlreadyDefined] if a balance already exists,
/// - or [Error::SqlError] if there is some other SQL error.
fn insert_balance(amount: f64, connection: &Connection) -> Result<Balance, Error> {
    connection
        .execute(
            "INSERT INTO balances (id, balance) VALUES (?1, ?2)",
            params![BALANCE_ID, amount],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code:
                        rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_CHECK,
                },
                _,
            ) => Error::BalanceAlreadyDefined,
            error => error.into(),
        })?;

    Ok(Balance {
        id: BALANCE_ID,
        balance: amount,
    })
}

/// Set the initial balance of the ledger.
///
/// The initial balance can only be set once. To start over, reset the ledger.
///
/// # Errors
/// This function will return a:
/// - [Error::BalanceAlreadyDefined] if the initial balance has already been set,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn set_initial_balance(amount: f64, connection: &mut Connection) -> Result<Balance, Error> {
    let transaction = connection.transaction()?;

    match get_balance(&transaction) {
        Ok(_) => return Err(Error::BalanceAlreadyDefined),
        Err(Error::BalanceNotDefined) => {}
        Err(error) => return Err(error),
    }

    let balance = insert_balance(amount, &transaction)?;
    transaction.commit()?;

    Ok(balance)
}

/// Add `delta` to the balance and return the new balance.
///
/// Call this inside a database transaction so that the read and the write
/// cannot be interleaved with another update.
///
/// # Errors
/// This function will return a:
/// - [Error::BalanceNotDefined] if the initial balance has not been set,
/// - [Error::BalanceOutOfRange] if the new balance would not be a finite number,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn adjust_balance(delta: f64, connection: &Connection) -> Result<f64, Error> {
    let new_balance = get_balance(connection)?.balance + delta;

    if !new_balance.is_finite() {
        return Err(Error::BalanceOutOfRange);
    }

    connection.execute(
        "UPDATE balances SET balance = ?1 WHERE id = ?2",
        params![new_balance, BALANCE_ID],
    )?;

    Ok(new_balance)
}

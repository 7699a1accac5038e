//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    balance::{adjust_balance, get_balance},
    database_id::TransactionId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was spent or earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was spent.
    Expense,
    /// Money that was earned.
    Income,
}

impl TransactionType {
    /// The label used for this type in the database and in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }

    /// Apply the sign for this type to a transaction value.
    ///
    /// Values are stored as positive magnitudes, so an expense of 5 moves the
    /// balance by -5 and an income of 5 moves it by +5.
    pub fn signed_value(&self, value: f64) -> f64 {
        match self {
            TransactionType::Expense => -value,
            TransactionType::Income => value,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(format!("unknown transaction type \"{other}\"")),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Whether the transaction was an expense or income.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// A lower case text description of what the transaction was for.
    pub text: String,
    /// The amount of money spent or earned, always positive.
    pub value: f64,
}

impl Transaction {
    /// Create a new transaction dated now.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(kind: TransactionType, text: &str, value: f64) -> NewTransaction {
        NewTransaction {
            kind,
            text: text.to_owned(),
            value,
            date: OffsetDateTime::now_utc(),
        }
    }
}

/// A transaction that has not been saved to the database yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the transaction is an expense or income.
    pub kind: TransactionType,
    /// The description as given by the user, it is lower-cased when saved.
    pub text: String,
    /// The positive amount of money.
    pub value: f64,
    /// When the transaction happened, defaults to now.
    pub date: OffsetDateTime,
}

impl NewTransaction {
    /// Set the date for the transaction.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = date;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('expense', 'income')),
                text TEXT NOT NULL,
                value REAL NOT NULL CHECK (value > 0)
                )",
        (),
    )?;

    // Used for finding today's transactions.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_type ON transactions(type);",
        (),
    )?;

    Ok(())
}

/// Insert a transaction without touching the balance.
///
/// The text is lower-cased and the date is converted to UTC so that dates
/// can be compared as text in queries.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn insert_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO transactions (date, type, text, value)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, date, type, text, value",
        )?
        .query_row(
            (
                new_transaction.date.to_offset(UtcOffset::UTC),
                new_transaction.kind,
                new_transaction.text.to_lowercase(),
                new_transaction.value,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare("SELECT id, date, type, text, value FROM transactions WHERE id = :id")?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get every transaction of the type `kind` in the order they were created.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn list_transactions_by_type(
    kind: TransactionType,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, date, type, text, value FROM transactions WHERE type = :type ORDER BY id",
        )?
        .query_map(&[(":type", &kind)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get every transaction dated on or after `since`, in the order they were created.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn list_transactions_since(
    since: OffsetDateTime,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, date, type, text, value FROM transactions WHERE date >= :since ORDER BY id",
        )?
        .query_map(
            &[(":since", &since.to_offset(UtcOffset::UTC))],
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Save a new transaction and move the balance by its value.
///
/// The balance check, the insert and the balance update happen in one
/// database transaction, so either both rows are written or neither is.
///
/// # Errors
/// This function will return a:
/// - [Error::BalanceNotDefined] if the initial balance has not been set,
/// - [Error::BalanceOutOfRange] if the new balance would not be a finite number,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn record_transaction(
    kind: TransactionType,
    text: &str,
    value: f64,
    connection: &mut Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = connection.transaction()?;

    get_balance(&sql_transaction)?;
    let transaction = insert_transaction(Transaction::build(kind, text, value), &sql_transaction)?;
    adjust_balance(kind.signed_value(value), &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(transaction)
}

/// Delete a transaction and undo its effect on the balance.
///
/// Returns the deleted transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction,
/// - [Error::BalanceNotDefined] if the initial balance has not been set,
/// - [Error::BalanceOutOfRange] if undoing the transaction would overflow the balance,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn remove_transaction(
    id: TransactionId,
    connection: &mut Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = connection.transaction()?;

    let transaction = get_transaction(id, &sql_transaction).map_err(|error| match error {
        Error::NotFound => Error::DeleteMissingTransaction,
        error => error,
    })?;
    get_balance(&sql_transaction)?;

    sql_transaction.execute("DELETE FROM transactions WHERE id = :id", &[(":id", &id)])?;
    adjust_balance(
        -transaction.kind.signed_value(transaction.value),
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(transaction)
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let kind = row.get(2)?;
    let text = row.get(3)?;
    let value = row.get(4)?;

    Ok(Transaction {
        id,
        date,
        kind,
        text,
        value,
    })
}

// ============================================================================
// TESTS
// ============================================================================

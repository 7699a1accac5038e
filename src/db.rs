//! Sets up the database schema for the ledger.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, balance::create_balance_table, transaction::create_transaction_table};

/// Create all of the database tables for the application.
///
/// Tables are only created if they do not already exist, so this function is
/// safe to call every time the server starts.
///
/// # Errors
/// This function may return an [Error::SqlError] if there is an SQL error
/// while creating the tables. Nothing is created in that case.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_balance_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the lock on the shared database connection.
///
/// The connection is released when the returned guard is dropped.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock has been poisoned by a
/// thread that panicked while holding it.
pub(crate) fn acquire_connection(
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

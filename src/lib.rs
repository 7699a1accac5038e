//! Ledger is a small web service for keeping track of a single running balance.
//!
//! This library provides a JSON REST API for setting an initial balance and
//! recording the income and expenses that move it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod amount;
mod app_state;
mod balance;
mod database_id;
mod db;
mod endpoints;
mod extract;
mod logging;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use balance::{Balance, get_balance, set_initial_balance};
pub use database_id::{DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{Transaction, TransactionType, record_transaction};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The initial balance was missing or was not a finite number.
    #[error("Invalid balance value")]
    InvalidBalance,

    /// The text or value of a new transaction was missing or invalid.
    ///
    /// The text must contain at least one non-whitespace character and the
    /// value must be a finite number greater than zero.
    #[error("Missing or invalid required fields")]
    InvalidTransactionFields,

    /// The request body could not be parsed as JSON.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    /// The request body could not be read, e.g. the client closed the connection.
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),

    /// A parameter in the request path, e.g. a transaction ID, was malformed.
    #[error("Invalid path parameter: {0}")]
    InvalidPathParameter(String),

    /// The initial balance has already been set.
    ///
    /// The balance can only be set once, the client should reset the ledger
    /// first if they want to start over.
    #[error("Initial Balance Already Defined")]
    BalanceAlreadyDefined,

    /// An operation needed the balance before the initial balance was set.
    #[error("Initial Balance Not Defined")]
    BalanceNotDefined,

    /// Tried to delete a transaction that does not exist
    #[error("Transaction not found")]
    DeleteMissingTransaction,

    /// A transaction would move the balance outside the range of finite numbers.
    #[error("Balance out of range")]
    BalanceOutOfRange,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Not Found")]
    NotFound,

    /// The route exists but does not support the request's HTTP method.
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that should be sent to the client for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidBalance
            | Error::InvalidTransactionFields
            | Error::InvalidJson(_)
            | Error::InvalidRequestBody(_)
            | Error::InvalidPathParameter(_)
            | Error::BalanceAlreadyDefined
            | Error::BalanceNotDefined
            | Error::BalanceOutOfRange => StatusCode::BAD_REQUEST,
            Error::DeleteMissingTransaction | Error::NotFound => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezoneError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Any internal errors are not intended to be shown to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "Internal Server Error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::{Value, json};

    use crate::Error;

    async fn response_json(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn client_errors_include_message() {
        let (status, body) = response_json(Error::BalanceNotDefined).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Initial Balance Not Defined" }));
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (status, body) = response_json(Error::DeleteMissingTransaction).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Transaction not found" }));
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = response_json(Error::SqlError(
            rusqlite::Error::InvalidColumnName("secret_column".to_owned()),
        ))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal Server Error" }));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}

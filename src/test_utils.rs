//! Helpers shared by the tests.

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, build_router, endpoints, initialize_db};

/// An in-memory database with the tables created.
pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize_db(&conn).expect("Could not initialize database");
    conn
}

pub(crate) fn get_test_state() -> AppState {
    AppState::new(
        Connection::open_in_memory().expect("Could not open in-memory SQLite database"),
        "Etc/UTC",
    )
    .expect("Could not create app state")
}

pub(crate) fn get_test_server() -> TestServer {
    TestServer::try_new(build_router(get_test_state())).expect("Could not create test server.")
}

/// A test server where the initial balance has been set to `balance`.
pub(crate) async fn get_test_server_with_balance(balance: f64) -> TestServer {
    let server = get_test_server();

    server
        .post(endpoints::BALANCE)
        .json(&json!({ "balance": balance }))
        .await
        .assert_status_ok();

    server
}

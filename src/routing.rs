//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get},
};

use crate::{
    AppState, Error,
    balance::{create_balance_endpoint, get_balance_endpoint, reset_ledger_endpoint},
    endpoints,
    transaction::{
        create_expense_endpoint, create_income_endpoint, delete_transaction_endpoint,
        get_todays_transactions_endpoint, list_expenses_endpoint, list_income_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::BALANCE,
            get(get_balance_endpoint)
                .post(create_balance_endpoint)
                .delete(reset_ledger_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::INCOME,
            get(list_income_endpoint).post(create_income_endpoint),
        )
        .route(endpoints::TRANSACTION, get(get_todays_transactions_endpoint))
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        .method_not_allowed_fallback(get_405_method_not_allowed)
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

async fn get_405_method_not_allowed() -> Error {
    Error::MethodNotAllowed
}

#[cfg(test)]
mod routing_tests {
    use serde_json::json;

    use crate::test_utils::get_test_server;

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/coffee").await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Not Found" }));
    }

    #[tokio::test]
    async fn wrong_method_is_rejected() {
        let server = get_test_server();

        for response in [
            server.put("/balance").await,
            server.delete("/expense").await,
            server.post("/transaction").await,
        ] {
            response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
            response.assert_json(&json!({ "error": "Method Not Allowed" }));
        }
    }
}

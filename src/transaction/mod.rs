//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionType`
//! - Database functions for storing, querying, and deleting transactions
//!   while keeping the balance in step
//! - Route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod today_endpoint;

pub use core::{
    Transaction, TransactionType, create_transaction_table, list_transactions_by_type,
    list_transactions_since, record_transaction, remove_transaction,
};
pub use create_endpoint::{create_expense_endpoint, create_income_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::{list_expenses_endpoint, list_income_endpoint};
pub use today_endpoint::get_todays_transactions_endpoint;

#[cfg(test)]
pub use core::insert_transaction;

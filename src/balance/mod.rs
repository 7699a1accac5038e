//! The singleton balance and the endpoints for setting, reading and resetting it.

mod core;
mod create_endpoint;
mod get_endpoint;
mod reset_endpoint;

pub use core::{Balance, adjust_balance, create_balance_table, get_balance, set_initial_balance};
pub use create_endpoint::create_balance_endpoint;
pub use get_endpoint::get_balance_endpoint;
pub use reset_endpoint::reset_ledger_endpoint;

use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use ledger_rs::{TransactionType, initialize_db, record_transaction, set_initial_balance};

/// A utility for creating a test database for the REST API server of ledger_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let mut conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Setting initial balance...");
    set_initial_balance(1000.0, &mut conn)?;

    println!("Creating test transactions...");
    for (kind, text, value) in [
        (TransactionType::Income, "Salary", 2500.0),
        (TransactionType::Expense, "Rent", 850.0),
        (TransactionType::Expense, "Groceries", 123.45),
        (TransactionType::Expense, "Coffee", 4.5),
        (TransactionType::Income, "Birthday gift", 50.0),
    ] {
        record_transaction(kind, text, value, &mut conn)?;
    }

    println!("Success!");

    Ok(())
}

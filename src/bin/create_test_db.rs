use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::datetime;

use expense_tracker::{Expense, create_category, create_expense, initialize_db};

/// A utility for creating a test database for the REST API server of expense_tracker.
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
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test categories...");
    let food = create_category("Food", "Groceries and eating out", &conn)?;
    let rent = create_category("Rent", "", &conn)?;
    let fun = create_category("Entertainment", "Movies, games and concerts", &conn)?;

    println!("Creating test expenses...");
    let expenses = [
        Expense::build(food.id, "Supermarket", 84.20).date(datetime!(2024-01-06 10:15 UTC)),
        Expense::build(food.id, "Pizza", 27.50).date(datetime!(2024-01-19 19:40 UTC)),
        Expense::build(rent.id, "January rent", 1200.0).date(datetime!(2024-01-01 9:00 UTC)),
        Expense::build(fun.id, "Cinema", 18.0)
            .date(datetime!(2024-01-27 20:00 UTC))
            .description("Two tickets"),
        Expense::build(food.id, "Supermarket", 91.35).date(datetime!(2024-02-03 11:05 UTC)),
        Expense::build(rent.id, "February rent", 1200.0).date(datetime!(2024-02-01 9:00 UTC)),
        Expense::build(fun.id, "Concert", 65.0).date(datetime!(2024-02-16 21:30 UTC)),
    ];

    for expense in expenses {
        create_expense(expense, &conn)?;
    }

    println!("Success!");

    Ok(())
}

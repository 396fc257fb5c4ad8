use std::error::Error;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use expense_tracker::{initialize_db, rebuild_monthly_stats};

/// Recompute every category's monthly stats from its expenses.
///
/// Use this to repair a database whose cached monthly totals no longer match
/// its expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    db_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if !args.db_path.is_file() {
        eprintln!("No database found at {:#?}", args.db_path);
        exit(1);
    }

    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let category_count = rebuild_monthly_stats(&conn)?;

    println!("Rebuilt the monthly stats of {category_count} categories.");

    Ok(())
}

//! Defines the core data models and database queries for expenses.
//!
//! The functions that write to the expense table also adjust the owning
//! category's monthly stats, and do both inside one transaction.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    database_id::{CategoryId, ExpenseId},
    db::with_transaction,
    stats::adjust_monthly_stats,
};

// ============================================================================
// MODELS
// ============================================================================

/// A single dated amount of money spent, belonging to exactly one category.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The ID of the category the expense belongs to.
    pub category_id: CategoryId,
    /// A short name for the expense.
    pub name: String,
    /// The amount of money spent.
    pub amount: f64,
    /// When the expense happened, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// A longer text description of the expense.
    pub description: String,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [NewExpense] for discoverability.
    pub fn build(category_id: CategoryId, name: &str, amount: f64) -> NewExpense {
        NewExpense {
            category_id,
            name: name.to_owned(),
            amount,
            date: None,
            description: String::new(),
        }
    }
}

/// The fields needed to create or update an [Expense].
///
/// # Examples
///
/// ```ignore
/// use time::macros::datetime;
///
/// let expense = create_expense(
///     Expense::build(category.id, "Coffee", 4.5)
///         .date(datetime!(2025-01-15 08:30 UTC))
///         .description("Flat white"),
///     &connection,
/// )?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The category the expense belongs to.
    pub category_id: CategoryId,
    /// A short name for the expense.
    pub name: String,
    /// The amount of money spent.
    pub amount: f64,
    /// When the expense happened.
    ///
    /// When creating an expense, `None` means now. When updating an expense,
    /// `None` keeps the stored date.
    pub date: Option<OffsetDateTime>,
    /// A longer text description of the expense.
    pub description: String,
}

impl NewExpense {
    /// Set the date of the expense.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the description of the expense.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new expense and add its amount to its category's monthly stats.
///
/// The date is stored in UTC, and the month it falls in is decided in UTC.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - [Error::MalformedMonthlyStats] if the category's stored stats cannot be decoded,
/// - or [Error::SqlError] if there is some other SQL error.
///
/// On error, neither the expense nor the stats are written.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let date = new_expense.date.unwrap_or_else(OffsetDateTime::now_utc);

    with_transaction(connection, |transaction| {
        let expense = transaction
            .prepare(
                "INSERT INTO expense (category_id, name, amount, date, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, category_id, name, amount, date, description",
            )?
            .query_row(
                (
                    new_expense.category_id,
                    &new_expense.name,
                    new_expense.amount,
                    to_utc(date),
                    &new_expense.description,
                ),
                map_expense_row,
            )
            .map_err(|error| map_write_error(error, new_expense.category_id))?;

        adjust_monthly_stats(transaction, expense.category_id, expense.amount, expense.date)?;

        Ok(expense)
    })
}

/// Overwrite the expense `expense_id` with `changes`, moving its amount from
/// the old category and month to the new category and month.
///
/// If `changes.date` is `None`, the stored date is kept.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if `expense_id` does not refer to an expense,
/// - [Error::InvalidCategory] if the new category ID does not refer to a real category,
/// - [Error::MalformedMonthlyStats] if either category's stored stats cannot be decoded,
/// - or [Error::SqlError] if there is some other SQL error.
///
/// On error, the expense and both categories are left as they were.
pub fn update_expense(
    expense_id: ExpenseId,
    changes: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    with_transaction(connection, |transaction| {
        let old_expense = get_expense(expense_id, transaction).map_err(|error| match error {
            Error::NotFound => Error::UpdateMissingExpense,
            error => error,
        })?;

        let date = changes.date.unwrap_or(old_expense.date);

        let new_expense = transaction
            .prepare(
                "UPDATE expense
                 SET category_id = ?1, name = ?2, amount = ?3, date = ?4, description = ?5
                 WHERE id = ?6
                 RETURNING id, category_id, name, amount, date, description",
            )?
            .query_row(
                (
                    changes.category_id,
                    &changes.name,
                    changes.amount,
                    to_utc(date),
                    &changes.description,
                    expense_id,
                ),
                map_expense_row,
            )
            .map_err(|error| map_write_error(error, changes.category_id))?;

        adjust_monthly_stats(
            transaction,
            old_expense.category_id,
            -old_expense.amount,
            old_expense.date,
        )?;
        adjust_monthly_stats(
            transaction,
            new_expense.category_id,
            new_expense.amount,
            new_expense.date,
        )?;

        Ok(new_expense)
    })
}

/// Delete an expense and subtract its amount from its category's monthly stats.
///
/// Returns the deleted expense.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if `expense_id` does not refer to an expense,
/// - [Error::MalformedMonthlyStats] if the category's stored stats cannot be decoded,
/// - or [Error::SqlError] if there is some other SQL error.
///
/// On error, the expense is not deleted.
pub fn delete_expense(expense_id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    with_transaction(connection, |transaction| {
        let expense = transaction
            .prepare(
                "DELETE FROM expense WHERE id = ?1
                 RETURNING id, category_id, name, amount, date, description",
            )?
            .query_row([expense_id], map_expense_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingExpense,
                error => error.into(),
            })?;

        adjust_monthly_stats(transaction, expense.category_id, -expense.amount, expense.date)?;

        Ok(expense)
    })
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, category_id, name, amount, date, description FROM expense WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Retrieve every expense ordered by ID.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, category_id, name, amount, date, description FROM expense ORDER BY id ASC",
        )?
        .query_map([], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Retrieve the expenses in the category `category_id` ordered by ID.
pub fn get_expenses_by_category(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, category_id, name, amount, date, description FROM expense
             WHERE category_id = :category_id ORDER BY id ASC",
        )?
        .query_map(&[(":category_id", &category_id)], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Get the total number of expenses in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            category_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_expense_category ON expense(category_id);",
    )?;

    Ok(())
}

/// Map a database row to an Expense.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let category_id = row.get(1)?;
    let name = row.get(2)?;
    let amount = row.get(3)?;
    let date = row.get(4)?;
    let description = row.get(5)?;

    Ok(Expense {
        id,
        category_id,
        name,
        amount,
        date,
        description,
    })
}

fn to_utc(date: OffsetDateTime) -> OffsetDateTime {
    date.to_offset(UtcOffset::UTC)
}

fn map_write_error(error: rusqlite::Error, category_id: CategoryId) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidCategory(category_id),
        error => error.into(),
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod shared_file_tests {
    use std::{fs, path::PathBuf, thread};

    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        category::{create_category, get_category},
        db::initialize,
        expense::{Expense, count_expenses, create_expense},
    };

    fn temp_db_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "expense_tracker_{name}_{}.db",
            std::process::id()
        ))
    }

    #[test]
    fn writers_on_separate_connections_keep_every_amount_in_monthly_stats() {
        let path = temp_db_path("separate_connections");
        let _ = fs::remove_file(&path);
        let connection = Connection::open(&path).unwrap();
        initialize(&connection).unwrap();
        let category_id = create_category("Food", "", &connection).unwrap().id;

        let writers: Vec<_> = (0..2)
            .map(|writer| {
                let path = path.clone();
                thread::spawn(move || {
                    let connection = Connection::open(path).unwrap();
                    for i in 0..25 {
                        create_expense(
                            Expense::build(category_id, &format!("Writer {writer} #{i}"), 2.0)
                                .date(datetime!(2024-07-01 10:00 UTC)),
                            &connection,
                        )
                        .unwrap();
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().expect("writer thread panicked");
        }

        assert_eq!(count_expenses(&connection), Ok(50));
        let category = get_category(category_id, &connection).unwrap();
        assert_eq!(category.monthly_stats.get("2024-07"), Some(100.0));

        drop(connection);
        fs::remove_file(path).unwrap();
    }
}

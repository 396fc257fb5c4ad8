//! Database initialization and the scoped transaction used for every write
//! that must be all-or-nothing.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, category::create_category_table, expense::create_expense_table};

/// Create the all of the database tables for the application.
///
/// Foreign keys are switched on for `connection`, deleting a category
/// cascades to its expenses.
///
/// # Errors
/// This function will return an error if a table could not be created or the
/// foreign key pragma could not be set.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // The pragma is a no-op inside a transaction, so it must be set first.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Run `operation` inside a transaction and commit it only if `operation`
/// returns `Ok`.
///
/// The transaction is `IMMEDIATE`, so the write lock is held from the first
/// read onwards and concurrent read-modify-write cycles cannot interleave.
/// On any error, including a failed commit, the transaction is dropped and
/// everything written through it is rolled back.
///
/// `connection` must not already be inside a transaction.
///
/// # Errors
/// Returns the error from `operation`, or an [Error::SqlError] if the
/// transaction could not be started or committed.
pub fn with_transaction<T, F>(connection: &Connection, operation: F) -> Result<T, Error>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, Error>,
{
    // Using new_unchecked because we only have &Connection from the MutexGuard.
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let value = operation(&transaction)?;

    transaction.commit()?;

    Ok(value)
}

/// Acquire the shared database connection.
///
/// # Errors
/// Returns an [Error::DatabaseLockError] if the mutex has been poisoned.
pub fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{Error, db::initialize};

    use super::with_transaction;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn count_categories(connection: &Connection) -> u32 {
        connection
            .query_row("SELECT COUNT(id) FROM category", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn initialize_is_idempotent() {
        let conn = get_test_connection();

        assert_eq!(initialize(&conn), Ok(()));
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let conn = get_test_connection();

        let enabled: bool = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();

        assert!(enabled);
    }

    #[test]
    fn commits_on_success() {
        let conn = get_test_connection();

        let result = with_transaction(&conn, |transaction| {
            transaction.execute(
                "INSERT INTO category (name, description) VALUES ('Food', '')",
                (),
            )?;
            Ok(())
        });

        assert_eq!(result, Ok(()));
        assert_eq!(count_categories(&conn), 1);
    }

    #[test]
    fn rolls_back_on_error() {
        let conn = get_test_connection();

        let result: Result<(), Error> = with_transaction(&conn, |transaction| {
            transaction.execute(
                "INSERT INTO category (name, description) VALUES ('Food', '')",
                (),
            )?;
            Err(Error::NotFound)
        });

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(count_categories(&conn), 0);
    }
}

//! Keeps each category's cached monthly stats equal to the sum of its
//! expenses per month.
//!
//! Every write to the expense table goes through [adjust_monthly_stats] in
//! the same transaction as the write itself.

use std::collections::HashMap;

use rusqlite::{Connection, Transaction};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::CategoryId,
    db::with_transaction,
    expense::{Expense, get_all_expenses},
    stats::{MonthKey, MonthlyStats},
};

/// Add `delta` to the total for the month of `date` in the monthly stats of
/// the category `category_id`.
///
/// The stats are read, updated and written back through `transaction`, so the
/// caller decides whether the change is committed together with the expense
/// write that caused it.
///
/// # Errors
/// This function will return a:
/// - [Error::StatsCategoryMissing] if `category_id` does not refer to a category,
/// - [Error::MalformedMonthlyStats] if the stored stats cannot be decoded,
/// - [Error::NonFiniteMonthlyTotal] if the new total cannot be stored,
/// - or [Error::SqlError] if there is some other SQL error.
///
/// In every case nothing has been written and the caller must roll back.
pub fn adjust_monthly_stats(
    transaction: &Transaction,
    category_id: CategoryId,
    delta: f64,
    date: OffsetDateTime,
) -> Result<(), Error> {
    let raw_stats: Option<String> = transaction
        .query_row(
            "SELECT monthly_stats FROM category WHERE id = ?1",
            [category_id],
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => {
                tracing::error!(
                    "could not adjust monthly stats: category {category_id} does not exist"
                );
                Error::StatsCategoryMissing(category_id)
            }
            error => error.into(),
        })?;

    let mut monthly_stats = MonthlyStats::decode(raw_stats.as_deref()).inspect_err(|error| {
        tracing::error!("could not decode monthly stats for category {category_id}: {error}")
    })?;

    let month = MonthKey::from_date(date.date());
    tracing::debug!("adjusting monthly stats for category {category_id}: {month} += {delta}");
    monthly_stats.add(month, delta);

    let encoded_stats = monthly_stats.encode().inspect_err(|error| {
        tracing::error!("could not encode monthly stats for category {category_id}: {error}")
    })?;

    transaction.execute(
        "UPDATE category SET monthly_stats = ?1 WHERE id = ?2",
        (encoded_stats, category_id),
    )?;

    Ok(())
}

/// Recompute the monthly stats of every category from the expense table and
/// overwrite the cached values.
///
/// Returns the number of categories that were updated.
///
/// # Errors
/// Returns an [Error::SqlError] if a query fails, in which case no category
/// has been changed.
pub fn rebuild_monthly_stats(connection: &Connection) -> Result<usize, Error> {
    with_transaction(connection, |transaction| {
        let expenses = get_all_expenses(transaction)?;
        let mut stats_by_category = compute_monthly_stats(&expenses);

        let category_ids = transaction
            .prepare("SELECT id FROM category ORDER BY id")?
            .query_map([], |row| row.get::<_, CategoryId>(0))?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;

        for category_id in &category_ids {
            let monthly_stats = stats_by_category.remove(category_id).unwrap_or_default();

            transaction.execute(
                "UPDATE category SET monthly_stats = ?1 WHERE id = ?2",
                (monthly_stats.encode()?, category_id),
            )?;
        }

        tracing::info!("rebuilt monthly stats for {} categories", category_ids.len());

        Ok(category_ids.len())
    })
}

/// Group `expenses` by category and sum their amounts per month.
pub fn compute_monthly_stats(expenses: &[Expense]) -> HashMap<CategoryId, MonthlyStats> {
    let mut stats_by_category: HashMap<CategoryId, MonthlyStats> = HashMap::new();

    for expense in expenses {
        stats_by_category
            .entry(expense.category_id)
            .or_default()
            .add(MonthKey::from_date(expense.date.date()), expense.amount);
    }

    stats_by_category
}


#[cfg(test)]
mod rebuild_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        category::{create_category, get_category},
        db::initialize,
        expense::{Expense, create_expense},
        stats::{MonthlyStats, rebuild_monthly_stats},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn rebuild_repairs_drifted_stats() {
        let conn = get_test_connection();
        let food = create_category("Food", "", &conn).unwrap();
        let empty = create_category("Empty", "", &conn).unwrap();
        create_expense(
            Expense::build(food.id, "Bread", 4.5).date(datetime!(2024-03-02 9:00 UTC)),
            &conn,
        )
        .unwrap();
        create_expense(
            Expense::build(food.id, "Milk", 2.0).date(datetime!(2024-04-10 9:00 UTC)),
            &conn,
        )
        .unwrap();
        conn.execute(
            "UPDATE category SET monthly_stats = '{\"1999-01\": 12.0}'",
            (),
        )
        .unwrap();

        let updated = rebuild_monthly_stats(&conn).unwrap();

        assert_eq!(updated, 2);
        let food = get_category(food.id, &conn).unwrap();
        assert_eq!(food.monthly_stats.get("2024-03"), Some(4.5));
        assert_eq!(food.monthly_stats.get("2024-04"), Some(2.0));
        assert_eq!(food.monthly_stats.get("1999-01"), None);
        let empty = get_category(empty.id, &conn).unwrap();
        assert_eq!(empty.monthly_stats, MonthlyStats::new());
    }
}

//! Database operations for categories.

use std::collections::HashMap;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryDetails},
    database_id::CategoryId,
    db::with_transaction,
    expense::{Expense, get_all_expenses, get_expenses_by_category},
    stats::MonthlyStats,
};

/// A category row before its monthly stats have been decoded.
struct CategoryRow {
    id: CategoryId,
    name: String,
    description: Option<String>,
    monthly_stats: Option<String>,
}

impl CategoryRow {
    fn into_category(self) -> Result<Category, Error> {
        let monthly_stats =
            MonthlyStats::decode(self.monthly_stats.as_deref()).inspect_err(|error| {
                tracing::error!(
                    "could not decode monthly stats for category {}: {error}",
                    self.id
                )
            })?;

        Ok(Category {
            id: self.id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            monthly_stats,
        })
    }
}

/// Create a category with empty monthly stats and return it with its generated ID.
///
/// The insert is only committed if the returned row can be decoded.
pub fn create_category(
    name: &str,
    description: &str,
    connection: &Connection,
) -> Result<Category, Error> {
    with_transaction(connection, |transaction| {
        transaction
            .prepare(
                "INSERT INTO category (name, description) VALUES (?1, ?2)
                 RETURNING id, name, description, monthly_stats",
            )?
            .query_row((name, description), map_row)?
            .into_category()
    })
}

/// Retrieve a single category by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `category_id` does not refer to a valid category,
/// - [Error::MalformedMonthlyStats] if the stored stats cannot be decoded,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, description, monthly_stats FROM category WHERE id = :id")?
        .query_row(&[(":id", &category_id)], map_row)?
        .into_category()
}

/// Retrieve all categories ordered by ID.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, description, monthly_stats FROM category ORDER BY id ASC")?
        .query_map([], map_row)?
        .map(|maybe_row| maybe_row.map_err(Error::from)?.into_category())
        .collect()
}

/// Retrieve a single category along with its expenses.
pub fn get_category_details(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<CategoryDetails, Error> {
    let category = get_category(category_id, connection)?;
    let expenses = get_expenses_by_category(category_id, connection)?;

    Ok(CategoryDetails::new(category, expenses))
}

/// Retrieve all categories along with their expenses, ordered by category ID.
pub fn get_all_category_details(connection: &Connection) -> Result<Vec<CategoryDetails>, Error> {
    let categories = get_all_categories(connection)?;

    let mut expenses_by_category: HashMap<CategoryId, Vec<Expense>> = HashMap::new();
    for expense in get_all_expenses(connection)? {
        expenses_by_category
            .entry(expense.category_id)
            .or_default()
            .push(expense);
    }

    Ok(categories
        .into_iter()
        .map(|category| {
            let expenses = expenses_by_category
                .remove(&category.id)
                .unwrap_or_default();
            CategoryDetails::new(category, expenses)
        })
        .collect())
}

/// Update a category's name and description. Returns an error if the category doesn't exist.
///
/// The monthly stats are left unchanged. If the stored stats cannot be
/// decoded, the update is rolled back and [Error::MalformedMonthlyStats] is
/// returned.
pub fn update_category(
    category_id: CategoryId,
    name: &str,
    description: &str,
    connection: &Connection,
) -> Result<Category, Error> {
    with_transaction(connection, |transaction| {
        transaction
            .prepare(
                "UPDATE category SET name = ?1, description = ?2 WHERE id = ?3
                 RETURNING id, name, description, monthly_stats",
            )?
            .query_row((name, description, category_id), map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingCategory,
                error => error.into(),
            })?
            .into_category()
    })
}

/// Delete a category by ID, along with all of its expenses. Returns an error if the category doesn't exist.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            monthly_stats TEXT NOT NULL DEFAULT '{}'
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<CategoryRow, rusqlite::Error> {
    Ok(CategoryRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        monthly_stats: row.get(3)?,
    })
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        category::{
            create_category, delete_category, get_all_categories, get_all_category_details,
            get_category, get_category_details, update_category,
        },
        db::initialize,
        expense::{Expense, create_expense, get_expense},
        stats::MonthlyStats,
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();

        let category = create_category("Groceries", "Food and drink", &connection)
            .expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.name, "Groceries");
        assert_eq!(category.description, "Food and drink");
        assert_eq!(category.monthly_stats, MonthlyStats::new());
    }

    #[test]
    fn get_category_succeeds() {
        let connection = get_test_db_connection();
        let inserted = create_category("Foo", "", &connection).expect("Could not create test category");

        let selected = get_category(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let inserted = create_category("Foo", "", &connection).expect("Could not create test category");

        let selected = get_category(inserted.id + 123, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_category_with_malformed_stats_fails() {
        let connection = get_test_db_connection();
        let inserted = create_category("Foo", "", &connection).expect("Could not create test category");
        connection
            .execute("UPDATE category SET monthly_stats = '[1,2'", ())
            .unwrap();

        let selected = get_category(inserted.id, &connection);

        assert!(
            matches!(selected, Err(Error::MalformedMonthlyStats(_))),
            "want malformed stats error, got {selected:?}"
        );
    }

    #[test]
    fn null_description_reads_as_empty() {
        let connection = get_test_db_connection();
        connection
            .execute("INSERT INTO category (name) VALUES ('Bare')", ())
            .unwrap();

        let categories = get_all_categories(&connection).unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].description, "");
    }

    #[test]
    fn get_all_categories_in_id_order() {
        let connection = get_test_db_connection();
        let inserted = vec![
            create_category("Foo", "", &connection).unwrap(),
            create_category("Bar", "", &connection).unwrap(),
        ];

        let selected = get_all_categories(&connection).expect("Could not get all categories");

        assert_eq!(inserted, selected);
    }

    #[test]
    fn details_include_expenses_and_total() {
        let connection = get_test_db_connection();
        let food = create_category("Food", "", &connection).unwrap();
        let rent = create_category("Rent", "", &connection).unwrap();
        let bread = create_expense(
            Expense::build(food.id, "Bread", 4.5).date(datetime!(2024-03-02 9:00 UTC)),
            &connection,
        )
        .unwrap();
        let milk = create_expense(
            Expense::build(food.id, "Milk", 2.25).date(datetime!(2024-03-03 9:00 UTC)),
            &connection,
        )
        .unwrap();

        let details = get_category_details(food.id, &connection).unwrap();
        assert_eq!(details.total_amount, 6.75);
        assert_eq!(details.expenses, vec![bread, milk]);

        let all_details = get_all_category_details(&connection).unwrap();
        assert_eq!(all_details.len(), 2);
        assert_eq!(all_details[0].category.id, food.id);
        assert_eq!(all_details[0].expenses.len(), 2);
        assert_eq!(all_details[1].category, rent);
        assert_eq!(all_details[1].total_amount, 0.0);
        assert!(all_details[1].expenses.is_empty());
    }

    #[test]
    fn update_category_keeps_monthly_stats() {
        let connection = get_test_db_connection();
        let category = create_category("Original", "", &connection).unwrap();
        create_expense(
            Expense::build(category.id, "Bread", 4.5).date(datetime!(2024-03-02 9:00 UTC)),
            &connection,
        )
        .unwrap();

        let updated = update_category(category.id, "Updated", "Now with words", &connection)
            .expect("Could not update category");

        assert_eq!(updated.id, category.id);
        assert_eq!(updated.name, "Updated");
        assert_eq!(updated.description, "Now with words");
        assert_eq!(updated.monthly_stats.get("2024-03"), Some(4.5));
        assert_eq!(get_category(category.id, &connection), Ok(updated));
    }

    #[test]
    fn update_category_with_malformed_stats_is_rolled_back() {
        let connection = get_test_db_connection();
        let category = create_category("Original", "", &connection).unwrap();
        connection
            .execute("UPDATE category SET monthly_stats = 'oops'", ())
            .unwrap();

        let result = update_category(category.id, "Renamed", "", &connection);

        assert!(
            matches!(result, Err(Error::MalformedMonthlyStats(_))),
            "want malformed stats error, got {result:?}"
        );
        let name: String = connection
            .query_row(
                "SELECT name FROM category WHERE id = ?1",
                [category.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(name, "Original");
    }

    #[test]
    fn update_category_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = update_category(999999, "Updated", "", &connection);

        assert_eq!(result, Err(Error::UpdateMissingCategory));
    }

    #[test]
    fn delete_category_cascades_to_expenses() {
        let connection = get_test_db_connection();
        let category = create_category("ToDelete", "", &connection).unwrap();
        let expense = create_expense(
            Expense::build(category.id, "Bread", 4.5).date(datetime!(2024-03-02 9:00 UTC)),
            &connection,
        )
        .unwrap();

        let result = delete_category(category.id, &connection);

        assert!(result.is_ok());
        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
        assert_eq!(get_expense(expense.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_category_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = delete_category(999999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingCategory));
    }
}

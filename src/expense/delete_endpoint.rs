//! Defines the endpoint for deleting an expense.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    database_id::ExpenseId,
    db::lock_connection,
    expense::{ExpenseState, delete_expense},
    response::ApiResponse,
};

/// A route handler for deleting an expense.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    expense_id: Result<Path<ExpenseId>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, Error> {
    let Path(expense_id) = expense_id?;

    let connection = lock_connection(&state.db_connection)?;

    delete_expense(expense_id, &connection)
        .inspect_err(|error| tracing::error!("Could not delete expense {expense_id}: {error}"))?;

    Ok(Json(ApiResponse::message("Expense deleted successfully")))
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::delete};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;
    use time::macros::datetime;

    use crate::{
        AppState,
        category::{create_category, get_category},
        db::lock_connection,
        endpoints::{self, format_endpoint},
        expense::{Expense, ExpenseState, count_expenses, create_expense, delete_expense_endpoint},
    };

    fn get_test_server() -> (TestServer, ExpenseState) {
        let state = ExpenseState {
            db_connection: AppState::new(Connection::open_in_memory().unwrap())
                .unwrap()
                .db_connection,
        };
        let app = Router::new()
            .route(endpoints::EXPENSE, delete(delete_expense_endpoint))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn deletes_expense_and_subtracts_amount() {
        let (server, state) = get_test_server();
        let (category, expense) = {
            let connection = lock_connection(&state.db_connection).unwrap();
            let category = create_category("Food", "", &connection).unwrap();
            let expense = create_expense(
                Expense::build(category.id, "Groceries", 50.0)
                    .date(datetime!(2024-02-15 12:00 UTC)),
                &connection,
            )
            .unwrap();
            (category, expense)
        };

        let response = server
            .delete(&format_endpoint(endpoints::EXPENSE, expense.id))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Expense deleted successfully");

        let connection = lock_connection(&state.db_connection).unwrap();
        assert_eq!(count_expenses(&connection), Ok(0));
        let category = get_category(category.id, &connection).unwrap();
        assert_eq!(category.monthly_stats.get("2024-02"), Some(0.0));
    }

    #[tokio::test]
    async fn delete_missing_expense_is_not_found() {
        let (server, _) = get_test_server();

        let response = server
            .delete(&format_endpoint(endpoints::EXPENSE, 3))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}

//! Defines the endpoints for reading expenses.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde::Deserialize;

use crate::{
    Error,
    database_id::{CategoryId, ExpenseId},
    db::lock_connection,
    expense::{Expense, ExpenseState, get_all_expenses, get_expense, get_expenses_by_category},
    response::ApiResponse,
};

/// Filters for listing expenses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseQuery {
    /// Only list expenses in this category.
    category_id: Option<CategoryId>,
}

/// A route handler for listing expenses, optionally filtered by category.
pub async fn get_expenses_endpoint(
    State(state): State<ExpenseState>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Expense>>>, Error> {
    let Query(query) = query?;

    let connection = lock_connection(&state.db_connection)?;

    let expenses = match query.category_id {
        Some(category_id) => get_expenses_by_category(category_id, &connection),
        None => get_all_expenses(&connection),
    }
    .inspect_err(|error| tracing::error!("could not get expenses: {error}"))?;

    Ok(Json(ApiResponse::success(expenses)))
}

/// A route handler for getting a single expense.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    expense_id: Result<Path<ExpenseId>, PathRejection>,
) -> Result<Json<ApiResponse<Expense>>, Error> {
    let Path(expense_id) = expense_id?;

    let connection = lock_connection(&state.db_connection)?;

    let expense = get_expense(expense_id, &connection)
        .inspect_err(|error| tracing::error!("could not get expense {expense_id}: {error}"))?;

    Ok(Json(ApiResponse::success(expense)))
}

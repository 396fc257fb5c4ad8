//! Defines the endpoint for updating an expense.

use axum::{
    Json,
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
};

use crate::{
    Error,
    database_id::ExpenseId,
    db::lock_connection,
    expense::{Expense, ExpenseForm, ExpenseState, update_expense},
    response::ApiResponse,
};

/// A route handler for updating an expense, responds with the updated expense.
///
/// If the request has no date, the stored date is kept.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    expense_id: Result<Path<ExpenseId>, PathRejection>,
    form: Result<Json<ExpenseForm>, JsonRejection>,
) -> Result<Json<ApiResponse<Expense>>, Error> {
    let Path(expense_id) = expense_id?;
    let Json(form) = form?;

    let connection = lock_connection(&state.db_connection)?;

    let expense = update_expense(expense_id, form.into(), &connection)
        .inspect_err(|error| tracing::error!("Could not update expense {expense_id}: {error}"))?;

    Ok(Json(ApiResponse::success_with_message(
        "Expense updated successfully",
        expense,
    )))
}

//! Defines the endpoint for creating a new expense.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::CategoryId,
    db::lock_connection,
    expense::{Expense, ExpenseState, NewExpense, create_expense},
    response::ApiResponse,
};

/// The request body for creating or updating an expense.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseForm {
    /// The ID of the category the expense belongs to.
    pub category_id: CategoryId,
    /// A short name for the expense.
    pub name: String,
    /// The amount of money spent.
    pub amount: f64,
    /// An RFC 3339 timestamp of when the expense happened.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    /// A longer text description of the expense.
    #[serde(default)]
    pub description: Option<String>,
}

impl From<ExpenseForm> for NewExpense {
    fn from(form: ExpenseForm) -> Self {
        NewExpense {
            category_id: form.category_id,
            name: form.name,
            amount: form.amount,
            date: form.date,
            description: form.description.unwrap_or_default(),
        }
    }
}

/// A route handler for creating a new expense, responds with the created expense.
///
/// If the request has no date, the expense is dated now.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    form: Result<Json<ExpenseForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Expense>>), Error> {
    let Json(form) = form?;

    let connection = lock_connection(&state.db_connection)?;

    let expense = create_expense(form.into(), &connection)
        .inspect_err(|error| tracing::error!("could not create expense: {error}"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Expense created successfully",
            expense,
        )),
    ))
}

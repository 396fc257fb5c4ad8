//! Defines the endpoint for deleting a category.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    category::{CategoryState, delete_category},
    database_id::CategoryId,
    db::lock_connection,
    response::ApiResponse,
};

/// A route handler for deleting a category and all of its expenses.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    category_id: Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, Error> {
    let Path(category_id) = category_id?;

    let connection = lock_connection(&state.db_connection)?;

    delete_category(category_id, &connection)
        .inspect_err(|error| tracing::error!("could not delete category {category_id}: {error}"))?;

    Ok(Json(ApiResponse::message("Category deleted successfully")))
}

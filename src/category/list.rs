//! Defines the endpoints for reading categories.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    category::{CategoryDetails, CategoryState, get_all_category_details, get_category_details},
    database_id::CategoryId,
    db::lock_connection,
    response::ApiResponse,
};

/// A route handler for listing every category with its expenses.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<ApiResponse<Vec<CategoryDetails>>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let categories = get_all_category_details(&connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    Ok(Json(ApiResponse::success(categories)))
}

/// A route handler for getting a single category with its expenses.
pub async fn get_category_endpoint(
    State(state): State<CategoryState>,
    category_id: Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<ApiResponse<CategoryDetails>>, Error> {
    let Path(category_id) = category_id?;

    let connection = lock_connection(&state.db_connection)?;

    let category = get_category_details(category_id, &connection)
        .inspect_err(|error| tracing::error!("could not get category {category_id}: {error}"))?;

    Ok(Json(ApiResponse::success(category)))
}

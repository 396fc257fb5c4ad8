//! Defines the endpoint for creating a new category.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    Error,
    category::{Category, CategoryForm, CategoryState, create_category},
    db::lock_connection,
    response::ApiResponse,
};

/// A route handler for creating a new category, responds with the created category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    form: Result<Json<CategoryForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), Error> {
    let Json(form) = form?;

    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(
        &form.name,
        form.description.as_deref().unwrap_or_default(),
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not create category: {error}"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Category created successfully",
            category,
        )),
    ))
}

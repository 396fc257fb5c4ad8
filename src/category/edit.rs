//! Defines the endpoint for updating a category.

use axum::{
    Json,
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
};

use crate::{
    Error,
    category::{Category, CategoryForm, CategoryState, update_category},
    database_id::CategoryId,
    db::lock_connection,
    response::ApiResponse,
};

/// A route handler for updating a category's name and description.
///
/// The monthly stats are derived from the category's expenses and cannot be
/// changed through this endpoint.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    category_id: Result<Path<CategoryId>, PathRejection>,
    form: Result<Json<CategoryForm>, JsonRejection>,
) -> Result<Json<ApiResponse<Category>>, Error> {
    let Path(category_id) = category_id?;
    let Json(form) = form?;

    let connection = lock_connection(&state.db_connection)?;

    let category = update_category(
        category_id,
        &form.name,
        form.description.as_deref().unwrap_or_default(),
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not update category {category_id}: {error}"))?;

    Ok(Json(ApiResponse::success_with_message(
        "Category updated successfully",
        category,
    )))
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::put};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState,
        category::{CategoryState, create_category, update_category_endpoint},
        db::lock_connection,
        endpoints::{self, format_endpoint},
    };

    fn get_test_server() -> (TestServer, CategoryState) {
        let state = CategoryState {
            db_connection: AppState::new(Connection::open_in_memory().unwrap())
                .unwrap()
                .db_connection,
        };
        let app = Router::new()
            .route(endpoints::CATEGORY, put(update_category_endpoint))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn can_update_category() {
        let (server, state) = get_test_server();
        let category = create_category(
            "Foo",
            "",
            &lock_connection(&state.db_connection).unwrap(),
        )
        .unwrap();

        let response = server
            .put(&format_endpoint(endpoints::CATEGORY, category.id))
            .json(&json!({"name": "Bar", "description": "Baz"}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Category updated successfully");
        assert_eq!(body["data"]["id"], category.id);
        assert_eq!(body["data"]["name"], "Bar");
        assert_eq!(body["data"]["description"], "Baz");
    }

    #[tokio::test]
    async fn update_missing_category_is_not_found() {
        let (server, _) = get_test_server();

        let response = server
            .put(&format_endpoint(endpoints::CATEGORY, 42))
            .json(&json!({"name": "Bar"}))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["status"], "error");
    }
}

//! Application router configuration.

use std::path::Path;

use axum::{Router, middleware, routing::get};
use tower_http::services::{ServeDir, ServeFile};

use crate::{
    AppState, Error,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        get_category_endpoint, update_category_endpoint,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expense_endpoint,
        get_expenses_endpoint, update_expense_endpoint,
    },
    logging::logging_middleware,
    stats::get_statistics_endpoint,
};

/// Return a router with all the app's API routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::EXPENSES,
            get(get_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(update_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Return the API router with body logging, plus the front-end files from
/// `static_dir`.
///
/// Only API requests go through [logging_middleware]; static files are
/// streamed without being buffered.
pub fn build_app(state: AppState, static_dir: &Path) -> Router {
    let api = build_router(state).layer(middleware::from_fn(logging_middleware));

    serve_static_files(api, static_dir)
}

/// Serve the front-end from `static_dir`: files under `/static` and the
/// index page at `/`.
pub fn serve_static_files(router: Router, static_dir: &Path) -> Router {
    router
        .nest_service(endpoints::STATIC, ServeDir::new(static_dir))
        .route_service(
            endpoints::ROOT,
            ServeFile::new(static_dir.join("index.html")),
        )
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

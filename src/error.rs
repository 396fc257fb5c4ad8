//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{database_id::CategoryId, response::ApiResponse};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body could not be parsed into the expected type.
    ///
    /// The string holds the reason reported by the JSON extractor.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A path parameter or query string could not be parsed, e.g. a
    /// non-numeric ID.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The category ID used to create or update an expense did not match a
    /// valid category.
    #[error("category {0} does not exist")]
    InvalidCategory(CategoryId),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// The category whose monthly stats were being adjusted disappeared
    /// during the adjustment.
    #[error("could not find category {0} to adjust its monthly stats")]
    StatsCategoryMissing(CategoryId),

    /// A string was not a valid "YYYY-MM" month key.
    #[error("\"{0}\" is not a valid month key, expected the format YYYY-MM")]
    InvalidMonthKey(String),

    /// The monthly stats stored for a category could not be decoded.
    #[error("the stored monthly stats are malformed: {0}")]
    MalformedMonthlyStats(String),

    /// A monthly total overflowed to infinity or became NaN and cannot be
    /// stored as JSON.
    #[error("the monthly total for {0} is not a finite number")]
    NonFiniteMonthlyTotal(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The response body could not be read back for logging.
    #[error("could not read the response body: {0}")]
    ResponseBodyError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRequestBody(_) | Error::InvalidRequest(_) | Error::InvalidCategory(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingExpense
            | Error::DeleteMissingExpense => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            // Any errors that are not client errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

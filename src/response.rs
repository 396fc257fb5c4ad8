//! The uniform JSON envelope wrapped around every API response.

use serde::{Deserialize, Serialize};

/// Whether a request succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The request was handled successfully.
    Success,
    /// The request failed, see the message for details.
    Error,
}

/// The body of every API response: `{status, message, data}`.
///
/// `message` is always present, but may be empty. `data` is left out of the
/// JSON when there is nothing to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub status: ResponseStatus,
    /// A human readable description of the outcome.
    pub message: String,
    /// The payload of a successful request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data` and no message.
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: String::new(),
            data: Some(data),
        }
    }

    /// A successful response carrying `data` and a message.
    pub fn success_with_message(message: &str, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.to_owned(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A successful response with a message and no data.
    pub fn message(message: &str) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.to_owned(),
            data: None,
        }
    }

    /// A failed response.
    pub fn error(message: String) -> Self {
        Self {
            status: ResponseStatus::Error,
            message,
            data: None,
        }
    }
}

//! Standardized API error body.

use serde::{Deserialize, Serialize};

/// JSON error body: `{"message": ..., "error": ...}`.
///
/// `error` carries the underlying failure text for server errors and is
/// omitted everywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn unauthorized() -> Self {
        Self::new("Access token required")
    }

    pub fn server_error(detail: impl Into<String>) -> Self {
        Self::new("Server error").with_error(detail)
    }
}

//! The `{success, data}` JSON envelope every admin endpoint answers with.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// JSON envelope shared by success and error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AjaxResponse<T> {
    /// Whether the request was handled
    pub success: bool,
    /// Payload on success, error message on failure
    pub data: T,
}

impl<T: Serialize> AjaxResponse<T> {
    /// Wraps a successful payload.
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl AjaxResponse<String> {
    /// Wraps an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for AjaxResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

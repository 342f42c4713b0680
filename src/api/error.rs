//! Request-level failures of the admin endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::response::AjaxResponse;
use crate::errors::Error;

/// Errors that abort a whole request before or during processing.
#[derive(Debug, Error)]
pub enum AjaxError {
    /// Missing or unknown bearer token
    #[error("Authentication required")]
    Unauthenticated,

    /// Missing, expired or forged nonce
    #[error("Invalid security token")]
    InvalidNonce,

    /// The admin lacks the profile's capability
    #[error("Permission denied")]
    PermissionDenied,

    /// Input rejected before any row was touched
    #[error("{0}")]
    BadRequest(String),

    /// Anything the client cannot fix
    #[error("Internal server error")]
    Internal(#[source] Error),
}

impl AjaxError {
    /// Shorthand for [`AjaxError::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Status code this error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InvalidNonce | Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for AjaxError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidFormId { .. } | Error::InvalidQuantity { .. } | Error::NoCouponCodes => {
                Self::BadRequest(err.to_string())
            }
            other => Self::Internal(other),
        }
    }
}

impl IntoResponse for AjaxError {
    fn into_response(self) -> Response {
        // Don't expose internal error details to clients
        match &self {
            Self::Internal(source) => {
                tracing::error!(error = %source, "Admin request failed");
            }
            Self::BadRequest(message) => tracing::debug!(%message, "Rejected admin request"),
            _ => tracing::warn!(error = %self, "Unauthorized admin request"),
        }

        (self.status(), AjaxResponse::error(self.to_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AjaxError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AjaxError::InvalidNonce.status(), StatusCode::FORBIDDEN);
        assert_eq!(AjaxError::PermissionDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AjaxError::bad_request("Unknown action").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_domain_errors_map_to_bad_request_or_internal() {
        let err = AjaxError::from(Error::NoCouponCodes);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "No valid coupon codes found in CSV");

        let err = AjaxError::from(Error::Database(sea_orm::DbErr::Custom(
            "disk full".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }
}

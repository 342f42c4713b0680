//! Unified error types for the coupon manager.
//!
//! Domain failures that abort a whole request live here. Per-row failures of a
//! bulk operation are not errors; they are recorded in the batch result.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV input could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (config file, socket binding)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable is missing or not unicode
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// The target form id is missing or not a positive integer
    #[error("Invalid form_id provided")]
    InvalidFormId {
        /// The rejected form id
        form_id: i64,
    },

    /// A generation batch asked for too few or too many coupons
    #[error("Quantity must be between 1 and 1000 (got {quantity})")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: u32,
    },

    /// The uploaded CSV did not contain a single coupon code
    #[error("No valid coupon codes found in CSV")]
    NoCouponCodes,
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config {
            message: "missing NONCE_SECRET".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: missing NONCE_SECRET");

        let err = Error::InvalidFormId { form_id: -3 };
        assert_eq!(err.to_string(), "Invalid form_id provided");

        assert_eq!(
            Error::NoCouponCodes.to_string(),
            "No valid coupon codes found in CSV"
        );
    }

    #[test]
    fn test_db_err_conversion() {
        let err: Error = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, Error::Database(_)));
    }
}

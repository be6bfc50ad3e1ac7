//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the cache engine.
///
/// Both variants are input validation failures; no mutation has happened
/// when either is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The TTL passed to `set` is not a valid duration string
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// The search pattern is not a valid glob or regular expression
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

// == API Error Enum ==
/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Engine rejected the input
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Cache(_) | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for engine operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_messages() {
        let err = CacheError::InvalidTtl("5 parsecs".to_string());
        assert_eq!(err.to_string(), "Invalid TTL: 5 parsecs");

        let err = CacheError::InvalidPattern("[a".to_string());
        assert_eq!(err.to_string(), "Invalid pattern: [a");
    }

    #[test]
    fn test_api_error_wraps_cache_error() {
        let err: ApiError = CacheError::InvalidPattern("(".to_string()).into();
        assert_eq!(err.to_string(), "Invalid pattern: (");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_request_status() {
        let err = ApiError::InvalidRequest("Key cannot be empty".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}

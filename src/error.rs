//! Error types for the cache facade and its HTTP surface
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
/// Error type for every cache operation.
///
/// A missing entry is not an error: fetches return `Ok(None)`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Identity operation on a type with no discoverable identifier
    #[error("Identity unresolved for type '{0}'")]
    IdentityUnresolved(String),

    /// Codec failed to encode or decode a payload
    #[error("Serialization failure: {0}")]
    Serialization(String),

    /// Transport-level failure talking to the backend
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Bucket-style operation requested from a strategy without buckets
    #[error("Unsupported operation '{operation}' for {strategy} strategy")]
    UnsupportedOperation {
        operation: &'static str,
        strategy: &'static str,
    },

    /// Malformed configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::BackendUnavailable(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

// == API Error Enum ==
/// Errors surfaced by the admin HTTP API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key not found in the backend
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Cache(err) => match err {
                CacheError::IdentityUnresolved(_) => StatusCode::BAD_REQUEST,
                CacheError::Serialization(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CacheError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                CacheError::UnsupportedOperation { .. } => StatusCode::NOT_IMPLEMENTED,
                CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roster_kv::KVError;
use thiserror::Error;

/// Unified service error type used by every module.
///
/// Each variant maps to a default HTTP status code. Route handlers may
/// choose a different status for a given operation; `status_code` is the
/// fallback when no route-specific mapping applies.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The record store could not be reached or failed mid-operation. HTTP 500.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The identifier is not structurally valid. HTTP 400.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// Valid identifier, no such record. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid required field. HTTP 400.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unexpected internal error (corrupt document, template failure). HTTP 500.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Plain-text response: the status from [`ServiceError::status_code`] and the
/// error message as the body.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

impl From<KVError> for ServiceError {
    fn from(err: KVError) -> Self {
        match err {
            KVError::Storage(msg) => ServiceError::StoreUnavailable(msg),
            KVError::Serialization(msg) => ServiceError::Internal(msg),
        }
    }
}

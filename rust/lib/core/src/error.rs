use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes. Clients branch on these, not on messages.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error returned by every portal and auth operation.
///
/// Rendered as `{"code": "INVALID_TRANSITION", "message": "..."}` with the
/// matching HTTP status.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing, or owned by another customer. 404.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate key or a concurrent modification. 409.
    #[error("{0}")]
    Conflict(String),

    /// 400.
    #[error("{0}")]
    Validation(String),

    /// Missing, expired or revoked token; bad credentials. 401.
    #[error("{0}")]
    Unauthorized(String),

    /// 403.
    #[error("{0}")]
    PermissionDenied(String),

    /// Status change not allowed from the record's current state. 409.
    #[error("{0}")]
    InvalidTransition(String),

    /// 500.
    #[error("{0}")]
    Storage(String),

    /// 500.
    #[error("{0}")]
    Internal(String),
}

/// Wire shape of an error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ServiceError {
    fn parts(&self) -> (StatusCode, &'static str) {
        use error_code::*;
        match self {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND),
            ServiceError::Conflict(_) => (StatusCode::CONFLICT, ALREADY_EXISTS),
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, VALIDATION_FAILED),
            ServiceError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, UNAUTHENTICATED),
            ServiceError::PermissionDenied(_) => (StatusCode::FORBIDDEN, PERMISSION_DENIED),
            ServiceError::InvalidTransition(_) => (StatusCode::CONFLICT, INVALID_TRANSITION),
            ServiceError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, STORAGE_ERROR),
            ServiceError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.parts().1
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status_code(), axum::Json(self.body())).into_response()
    }
}

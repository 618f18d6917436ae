//! Backend error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4003,
///     "message": "not enough spots available: requested 3, remaining 1",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ApiError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category              | HTTP Status                  |
/// |-----------|-----------------------|------------------------------|
/// | 1000–1999 | Validation            | 400 Bad Request              |
/// | 2000–2999 | Identity/State        | 401 / 403 / 404 / 409        |
/// | 3000–3999 | Server                | 500 Internal Server Error    |
/// | 4000–4999 | Business precondition | 422 Unprocessable Entity     |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed before any state was touched.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Entity with the given ID was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind (e.g. `"tour"`, `"booking"`).
        kind: &'static str,
        /// The missing identifier.
        id: uuid::Uuid,
    },

    /// No authenticated identity was supplied with the request.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Caller does not own the resource or lacks the required role.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Tour is inactive or withdrawn from sale.
    #[error("tour is not available for booking")]
    Unavailable,

    /// Tour has no bookable departure on the requested date.
    #[error("tour is not available on the requested date")]
    DateUnavailable,

    /// Requested participants exceed remaining capacity.
    #[error("not enough spots available: requested {requested}, remaining {remaining}")]
    CapacityExceeded {
        /// Participants the caller asked for.
        requested: u32,
        /// The stricter of the two remaining-capacity ceilings.
        remaining: u32,
    },

    /// Illegal status transition (e.g. cancelling a completed booking).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Duplicate record or conflicting concurrent write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidInput(_) => 1001,
            Self::NotFound { .. } => 2001,
            Self::Unauthenticated(_) => 2002,
            Self::Forbidden(_) => 2003,
            Self::InvalidState(_) => 2004,
            Self::Conflict(_) => 2005,
            Self::Unavailable => 4001,
            Self::DateUnavailable => 4002,
            Self::CapacityExceeded { .. } => 4003,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::InvalidState(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unavailable | Self::DateUnavailable | Self::CapacityExceeded { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

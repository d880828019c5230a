//! Mapping from domain failures to HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::domain::DomainError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// An error response: status code plus a client-safe message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Logs `cause` and hides it from the client.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!("Request failed: {}", cause);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            DomainError::Validation(msg) => Self::bad_request(msg),
            DomainError::Unauthorized(msg) => Self::unauthorized(msg),
            DomainError::Forbidden(msg) => Self::forbidden(msg),
            DomainError::Unavailable(msg) => Self::new(StatusCode::SERVICE_UNAVAILABLE, msg),
            DomainError::Storage(_) => Self::internal(err),
        }
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::internal(format!("session store: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::listing_not_found(1), StatusCode::NOT_FOUND),
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::Unavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (DomainError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn storage_details_are_not_exposed() {
        let err = ApiError::from(DomainError::Storage("UNIQUE constraint failed: users".into()));
        assert_eq!(err.message, INTERNAL_MESSAGE);
    }
}

// src/server/error.rs
// HTTP error responses for the session API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

use crate::error::SessionError;

/// Standard API error response format
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    pub error_code: &'static str,
}

impl ApiError {
    fn new(status_code: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
            error_code,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::InvalidPersona(_) => Self::new(StatusCode::BAD_REQUEST, "INVALID_PERSONA", message),
            SessionError::Unbound | SessionError::NotReady { .. } => {
                Self::new(StatusCode::CONFLICT, "SESSION_NOT_READY", message)
            }
            SessionError::Resolution(_) => {
                warn!("Model resolution failed: {}", message);
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "RESOLUTION_FAILURE", message)
            }
            SessionError::Generation(_) => {
                error!("Generation failed: {}", message);
                Self::new(StatusCode::BAD_GATEWAY, "GENERATION_ERROR", message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": true,
            "message": self.message,
            "status": self.status_code.as_u16(),
            "error_code": self.error_code,
        });

        (self.status_code, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GenerationError, InvalidPersona, ResolutionFailure};

    #[test]
    fn test_session_error_mapping() {
        let cases = [
            (SessionError::InvalidPersona(InvalidPersona("x".into())), StatusCode::BAD_REQUEST),
            (SessionError::Unbound, StatusCode::CONFLICT),
            (SessionError::Resolution(ResolutionFailure::EmptyResult), StatusCode::SERVICE_UNAVAILABLE),
            (
                SessionError::Generation(GenerationError::EmptyReply { block_reason: None }),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code, status);
        }
    }
}

//! API error handling for consistent JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::pipeline::PipelineError;

/// API error type that converts to JSON responses.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": true,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::SessionActive | PipelineError::NoActiveSession => {
                Self::conflict(err.to_string())
            }
            PipelineError::EmptyCapture => Self::bad_request(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_conflicts_map_to_409() {
        let err = ApiError::from(PipelineError::SessionActive);
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err = ApiError::from(PipelineError::NoActiveSession);
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_pipeline_failures_map_to_500() {
        let err = ApiError::from(PipelineError::Timeout { attempts: 60 });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

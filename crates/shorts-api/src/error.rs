//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use shorts_ai::AiError;
use shorts_queue::QueueError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::NotFound(_) => Some("not_found"),
            ApiError::Validation(_) => Some("validation_failed"),
            ApiError::ServiceUnavailable(_) => Some("queue_unavailable"),
            ApiError::Upstream(_) => Some("upstream_failed"),
            _ => None,
        }
    }

    fn is_internal(&self) -> bool {
        matches!(self, ApiError::Internal(_) | ApiError::Upstream(_))
    }
}

impl From<QueueError> for ApiError {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::JobNotFound(_) => ApiError::NotFound("Job not found".to_string()),
            QueueError::QueueFull(_) | QueueError::Closed => {
                ApiError::ServiceUnavailable(e.to_string())
            }
            QueueError::DuplicateJob(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(e: AiError) -> Self {
        if e.is_config() {
            ApiError::Internal(e.to_string())
        } else {
            ApiError::Upstream(e.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        ApiError::Validation(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

/// Response extension set on errors whose detail comes from an internal or
/// upstream failure. `redact_internal_errors` strips the detail in production.
#[derive(Debug, Clone, Copy)]
pub struct InternalDetail {
    code: Option<&'static str>,
}

impl InternalDetail {
    /// Same status and code, generic detail.
    pub fn redacted(self, status: StatusCode) -> Response {
        error_response(status, "An internal error occurred".to_string(), self.code)
    }
}

fn error_response(status: StatusCode, detail: String, code: Option<&'static str>) -> Response {
    let body = ErrorResponse {
        detail,
        code: code.map(str::to_string),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let mut response = error_response(self.status_code(), self.to_string(), code);
        if self.is_internal() {
            response.extensions_mut().insert(InternalDetail { code });
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_errors_map_to_status() {
        assert_eq!(
            ApiError::from(QueueError::not_found("abc")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(QueueError::QueueFull(4)).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(QueueError::Closed).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_ai_errors_are_upstream() {
        let err = ApiError::from(AiError::request_failed("boom"));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.is_internal());
    }

    #[test]
    fn test_only_internal_errors_are_marked() {
        let response = ApiError::Upstream("sidecar down".to_string()).into_response();
        assert!(response.extensions().get::<InternalDetail>().is_some());

        let response = ApiError::not_found("Job not found").into_response();
        assert!(response.extensions().get::<InternalDetail>().is_none());
    }
}

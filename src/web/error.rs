// src/web/error.rs
use crate::web::types::StandardErrorResponse;
use rocket::http::Status;
use rocket::response::{self, status::Custom, Responder};
use rocket::serde::json::Json;
use rocket::Request;

/// Failures of a chat completion request, rendered as JSON error descriptors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Job search failed: {0}")]
    UpstreamFailure(String),
    #[error("Job search timed out after {0} seconds")]
    UpstreamTimeout(u64),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::InvalidRequest(_) => Status::BadRequest,
            ApiError::UpstreamFailure(_) => Status::BadGateway,
            ApiError::UpstreamTimeout(_) => Status::GatewayTimeout,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "INVALID_REQUEST",
            ApiError::UpstreamFailure(_) => "UPSTREAM_FAILURE",
            ApiError::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            ApiError::InvalidRequest(_) => vec![
                r#"Send a body like {"messages":[{"content":"software engineer"}]}"#.to_string(),
                "The first message must carry a non-empty content".to_string(),
            ],
            ApiError::UpstreamFailure(_) => vec![
                "The job boards may be blocking or rate limiting requests".to_string(),
                "Try again in a few moments".to_string(),
            ],
            ApiError::UpstreamTimeout(_) => vec![
                "Try again in a few moments".to_string(),
                "Try a more specific search".to_string(),
            ],
        }
    }

    pub fn to_error_response(&self) -> StandardErrorResponse {
        StandardErrorResponse::new(
            self.to_string(),
            self.error_code().to_string(),
            self.suggestions(),
        )
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        Custom(self.status(), Json(self.to_error_response())).respond_to(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_codes() {
        let invalid = ApiError::InvalidRequest("missing messages".to_string());
        assert_eq!(invalid.status(), Status::BadRequest);
        assert_eq!(invalid.error_code(), "INVALID_REQUEST");

        let failure = ApiError::UpstreamFailure("connection refused".to_string());
        assert_eq!(failure.status(), Status::BadGateway);

        let timeout = ApiError::UpstreamTimeout(20);
        assert_eq!(timeout.status(), Status::GatewayTimeout);
        assert_eq!(timeout.to_string(), "Job search timed out after 20 seconds");
    }

    #[test]
    fn test_error_descriptor() {
        let response = ApiError::UpstreamFailure("boom".to_string()).to_error_response();
        assert!(!response.success);
        assert_eq!(response.error_code, "UPSTREAM_FAILURE");
        assert_eq!(response.error, "Job search failed: boom");
        assert!(!response.suggestions.is_empty());
    }
}

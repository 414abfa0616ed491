use std::io::Error as IoError;

use actix_web::{
    http::{header::RETRY_AFTER, StatusCode},
    HttpResponse, ResponseError,
};
use thiserror::Error;

use crate::models::LeadSubmissionResponse;

pub mod config;
pub mod repository;

pub use config::ConfigError;
pub use repository::RepositoryError;

#[derive(Debug, Error)]
pub enum AppError {
    // Service-level domain errors
    #[error("{0}")]
    Validation(String),
    #[error("Too many submissions. Please try again later.")]
    RateLimited { retry_after_secs: u64 },
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("{0}")]
    Internal(String),
    // Infrastructure/system errors
    #[error("Server error: {0}")]
    Server(#[from] IoError),
    #[error("{0}")]
    Config(String),
    #[error("Logger error: {0}")]
    Logger(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Flatten field errors into a single string, sorted so the message is stable
        let mut fields = errors.field_errors().into_iter().collect::<Vec<_>>();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .map(|(_, errs)| {
                errs.iter()
                    .map(|e| {
                        e.message
                            .clone()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect::<Vec<_>>()
            .join(" ");
        AppError::Validation(message)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Internal(_)
            | AppError::Server(_)
            | AppError::Config(_)
            | AppError::Logger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        let error_message = if message.trim().is_empty() {
            "An error occurred".to_string()
        } else {
            message
        };

        let mut builder = HttpResponse::build(self.status_code());
        if let AppError::RateLimited { retry_after_secs } = self {
            builder.insert_header((RETRY_AFTER, retry_after_secs.to_string()));
        }
        builder.json(LeadSubmissionResponse::failed(error_message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_response_carries_retry_after() {
        let err = AppError::RateLimited { retry_after_secs: 42 };
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok()),
            Some("42")
        );
    }

    #[test]
    fn test_upstream_status_is_propagated() {
        let err = AppError::Upstream {
            status: 422,
            message: "Email is invalid".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        // Nonsense codes fall back to 500
        let err = AppError::Upstream {
            status: 42,
            message: "odd".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_error_body_is_failed_submission() {
        let response = AppError::Validation("Enter a valid email address.".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: LeadSubmissionResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, LeadSubmissionResponse::failed("Enter a valid email address."));
    }

    #[test]
    fn test_config_error_is_internal() {
        let err = AppError::Config("Form endpoint is not configured.".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Form endpoint is not configured.");
    }
}

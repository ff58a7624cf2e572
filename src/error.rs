use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use tracing::error;
use std::fmt::Display;

use crate::api::GenericResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not signed in")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_)
            | AppError::Serialization(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal details stay in the logs.
        let message = match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code()).json(GenericResponse::failure(message))
    }
}


pub trait TraceErr<T, E> {
    #[track_caller]
    fn trace_err(self, context: &'static str) -> std::result::Result<T, E>;
    fn trace(self) -> std::result::Result<T, E>;
}

impl<T, E: Display> TraceErr<T, E> for std::result::Result<T, E> {
    #[track_caller]
    fn trace_err(self, context: &'static str) -> std::result::Result<T, E> {
        if let Err(ref e) = self {
            let location = std::panic::Location::caller();
            error!(
                "{}:{}: error in {}: {}",
                location.file(),
                location.line(),
                context,
                e
            );
        }
        self
    }

    #[track_caller]
    fn trace(self) -> std::result::Result<T, E> {
        if let Err(ref e) = self {
            let location = std::panic::Location::caller();
            error!(
                "{}:{}: error: {}",
                location.file(),
                location.line(),
                e
            );
        }
        self
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn trace_err_passes_result_through() {
        let ok: std::result::Result<u8, AppError> = Ok(3);
        assert_eq!(ok.trace_err("test").ok(), Some(3));
        let err: std::result::Result<u8, AppError> = Err(AppError::Unauthorized);
        assert!(matches!(err.trace(), Err(AppError::Unauthorized)));
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "auth",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Internal(_) => "internal",
            AppError::Database(_) => "database",
            AppError::ValidationError(_) => "validation",
            AppError::Conflict(_) => "conflict",
            AppError::ExternalService(_) => "external_service",
        }
    }
}

// Admin clients read `success`, never the status line, so every failure is a 200.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        match &self {
            AppError::Auth(_) | AppError::ValidationError(_) | AppError::BadRequest(_) => {
                tracing::warn!(kind = self.kind(), "Request rejected: {}", message)
            }
            _ => tracing::error!(kind = self.kind(), "Error: {}", message),
        }

        let body = Json(json!({
            "success": false,
            "message": message
        }));

        (StatusCode::OK, body).into_response()
    }
}

use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Store request failed: {0}")]
    Store(String),

    #[error("Image upload failed: {0}")]
    ImageUpload(String),

    #[error("Concurrent update on {0}, retries exhausted")]
    Conflict(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<anyhow::Error> for AdminError {
    fn from(err: anyhow::Error) -> Self {
        AdminError::Store(err.to_string())
    }
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        let message = err.to_string();

        match err {
            AdminError::Validation(_) => AppError::ValidationError(message),
            AdminError::NotFound(_) => AppError::NotFound(message),
            AdminError::Store(msg) => AppError::Database(msg),
            AdminError::ImageUpload(msg) => AppError::ExternalService(msg),
            AdminError::Conflict(_) => AppError::Conflict(message),
            AdminError::Hashing(_) | AdminError::Serialization(_) => AppError::Internal(message),
        }
    }
}

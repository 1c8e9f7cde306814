/// Error types for post-service
///
/// Every failure a service operation can produce is a variant here; handlers
/// rely on the `ResponseError` impl to translate them to HTTP responses.
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no post found with that id")]
    PostNotFound,

    #[error("post already liked")]
    AlreadyLiked,

    #[error("post has not yet been liked")]
    NotLiked,

    #[error("comment does not exist")]
    CommentNotFound,

    #[error("user not authorized")]
    NotAuthorized,

    #[error("validation failed")]
    Validation(HashMap<String, String>),

    #[error("post was modified concurrently")]
    Conflict,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::PostNotFound | AppError::CommentNotFound => StatusCode::NOT_FOUND,
            AppError::AlreadyLiked | AppError::NotLiked | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotAuthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Validation failures carry field-level messages; everything else
        // gets the uniform error envelope.
        match self {
            AppError::Validation(fields) => {
                HttpResponse::build(status).json(serde_json::json!({ "errors": fields }))
            }
            _ => HttpResponse::build(status).json(serde_json::json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            })),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} field is invalid", field));
                (field.to_string(), message)
            })
            .collect();
        AppError::Validation(fields)
    }
}

//! Error types for the catalog server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Book, EntityKind};

/// Stable error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    StoreFailure = 3,
    NoSuchEntity = 5,
    HasDependents = 21,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Deletion refused because books still reference the entity
    #[error("{kind} is still referenced by {} book(s)", dependents.len())]
    ConstraintViolation {
        kind: EntityKind,
        dependents: Vec<Book>,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchEntity, msg.clone()),
            AppError::ConstraintViolation { .. } => {
                (StatusCode::CONFLICT, ErrorCode::HasDependents, self.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StoreFailure,
                    "Database error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = AppError::NotFound("Author x not found".into()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let store = AppError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let blocked = AppError::ConstraintViolation {
            kind: EntityKind::Genre,
            dependents: vec![],
        }
        .into_response();
        assert_eq!(blocked.status(), StatusCode::CONFLICT);
    }
}

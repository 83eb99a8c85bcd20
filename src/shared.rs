use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::auth::{AuthConfig, AuthError};
use crate::user::UserRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository>,
    pub auth_config: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(user_repository: Arc<dyn UserRepository>, auth_config: AuthConfig) -> Self {
        Self {
            user_repository,
            auth_config: Arc::new(auth_config),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("unknown user")]
    UnknownUser,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Credential => AppError::InvalidCredentials,
            AuthError::UnknownUser => AppError::UnknownUser,
            AuthError::Signing(msg) => AppError::Internal(msg),
            rejection => AppError::Unauthorized(rejection.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Token rejections all look alike to the client
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "invalid credentials".to_string())
            }
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            AppError::UnknownUser => (StatusCode::UNAUTHORIZED, "unknown user".to_string()),
            AppError::DatabaseError(msg) => {
                error!(error = %msg, "Database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "Internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message
        }));

        (status, body).into_response()
    }
}

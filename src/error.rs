use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    Validation(String),
    InvalidId(String),
    BadRequest(String),
    ConfigurationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::InvalidId(msg) => write!(f, "{}", msg),
            AppError::BadRequest(msg) => write!(f, "Invalid request body: {}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Every failure reaching a route collapses to a 500 with the message under "error".
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.to_string();
        match &self {
            AppError::DatabaseError(_) | AppError::ConfigurationError(_) => {
                tracing::error!("{}", error_message)
            }
            AppError::Validation(_) | AppError::InvalidId(_) | AppError::BadRequest(_) => {
                tracing::warn!("{}", error_message)
            }
        }

        let body = Json(json!({ "error": error_message }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

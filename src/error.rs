use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::notice::notice_repository::PersistenceError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("No handler registered for {0}")]
    HandlerNotRegistered(&'static str),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    InternalError,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Persistence(ref e) => {
                tracing::error!("Persistence error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::HandlerNotRegistered(request) => {
                tracing::error!("Dispatcher misconfigured: no handler for {}", request);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "Request cancelled"),
            AppError::Config(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

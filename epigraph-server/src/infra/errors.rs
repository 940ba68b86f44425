use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use epigraph_core::{ErrorKind, GraphError};
use serde_json::json;
use tracing::{error, info};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

// Every pipeline failure is a 5xx; only NotFound keeps its own wording.
impl From<GraphError> for AppError {
    fn from(err: GraphError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => info!(reason = %err, "no chart for request"),
            kind => error!(error = %err, ?kind, "chart pipeline failed"),
        }
        Self::internal(err.public_message())
    }
}

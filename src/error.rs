use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Config(String),
    Command(String),
    Io(std::io::Error),
    Csv(csv::Error),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {msg}"),
            AppError::Command(msg) => write!(f, "Command failed: {msg}"),
            AppError::Io(err) => write!(f, "I/O error: {err}"),
            AppError::Csv(err) => write!(f, "CSV error: {err}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    // Every failure surfaces as a 500 with the underlying text in `detail`;
    // callers are expected to read the message, not the status code.
    fn into_response(self) -> Response {
        let detail = self.to_string();
        tracing::error!("{detail}");

        let body = json!({ "detail": detail });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Csv(err)
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure modes of an outbound page fetch.
///
/// Transport problems (DNS, refused connections, TLS) are kept distinct from
/// timeouts and from upstream HTTP error statuses so callers can report them
/// differently. The extraction pipeline itself never fails.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("could not reach remote host: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("remote returned HTTP {0}")]
    Http(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Http(status.as_u16())
        } else {
            FetchError::Transport(e)
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to fetch image")]
    Relay,

    #[error("Internal server error")]
    Internal,
}

/// Map sqlx errors to AppError, with special handling for unique-constraint
/// violations so they surface as 409 Conflict rather than 500 Internal
/// Server Error. SQLite reports the violated column in the error message
/// (e.g. "UNIQUE constraint failed: products.code").
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                let detail = db_err.message().to_string();
                let message = if detail.contains("products.code") {
                    "Product code must be unique"
                } else if detail.contains("quotes.quote_number") {
                    "Quote number must be unique"
                } else {
                    "Resource already exists"
                };
                return AppError::Conflict(message.into());
            }
        }
        AppError::Database(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".into())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Fetch(e) => (StatusCode::BAD_REQUEST, format!("Failed to fetch URL: {e}")),
            AppError::Relay => (StatusCode::BAD_REQUEST, "Failed to fetch image".into()),
            AppError::Internal => {
                tracing::error!("Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

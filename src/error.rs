use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error returned by every catalog operation and handler.
///
/// Client-fixable variants carry the message shown to the caller. Server-side
/// failures keep their detail for the log and answer with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("User already exists with this email")]
    Conflict,

    /// Bad credentials. Never says whether the email or the password was wrong.
    #[error("Invalid email or password")]
    Auth,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Access denied. Admin privileges required.")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("File exceeds the {limit} byte upload limit")]
    PayloadTooLarge { limit: usize },

    #[error("Error processing {0} image")]
    Processing(&'static str),

    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Auth | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Processing(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Storage(e) => {
                tracing::error!(error = %format!("{e:#}"), "storage failure");
                "Internal server error".to_string()
            }
            AppError::Processing(_) => {
                tracing::error!(error = %self, "image processing failed");
                self.to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

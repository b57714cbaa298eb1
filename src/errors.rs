use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::booking_rules::BookingRuleError;

pub const NOT_FOUND_MESSAGE: &str = "Código de agendamento não encontrado.";

/// Failures surfaced by the booking client. Each variant carries the message
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    Load(String),

    #[error("{0}")]
    Validation(String),

    #[error("{NOT_FOUND_MESSAGE}")]
    NotFound { token: String },

    #[error("{0}")]
    Update(String),
}

impl BookingError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Errors returned by the reference booking service handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),
}

impl From<BookingRuleError> for AppError {
    fn from(err: BookingRuleError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = serde_json::json!({ "message": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

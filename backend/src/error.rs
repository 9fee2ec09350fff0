//! Error handling for the weather dashboard proxy
//!
//! Every failure is rendered as the `{success: false, error, message}`
//! envelope the browser expects.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{ApiResponse, InputError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Weather API key is not configured")]
    Configuration,

    // Validation errors
    #[error("{message}")]
    Validation { code: &'static str, message: String },

    // External service errors
    #[error("{message}")]
    Upstream {
        /// Provider HTTP status, if a response was received
        status: Option<u16>,
        message: String,
    },

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        AppError::Validation {
            code: "INVALID_PARAMS",
            message: message.into(),
        }
    }

    /// Wire error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Configuration => "API_KEY_MISSING",
            AppError::Validation { code, .. } => *code,
            AppError::Upstream { .. } => "API_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Configuration | AppError::Upstream { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<InputError> for AppError {
    fn from(e: InputError) -> Self {
        AppError::Validation {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let body: ApiResponse<()> = ApiResponse::failure(self.code(), self.to_string());
        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

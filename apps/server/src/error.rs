use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use donation_relay_core::errors::Error as CoreError;
use thiserror::Error;

use crate::models::ErrorResponse;

pub const INVALID_PAYLOAD: &str = "Invalid payload";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Details go to the log; callers only see a fixed message.
        let (status, message) = match &self {
            ApiError::Core(e) if e.is_validation() => (StatusCode::BAD_REQUEST, INVALID_PAYLOAD),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, INVALID_PAYLOAD),
            ApiError::Core(_) | ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Rejected request");
        }
        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

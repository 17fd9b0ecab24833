//! Error types for the contact endpoint

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contact_relay::{DeliveryError, ValidationError};
use serde_json::json;
use thiserror::Error;

/// Message for every failure that is not the client's fault
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Unreadable request body: {0}")]
    UnreadableBody(#[from] BytesRejection),

    #[error("Malformed request body: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Delivery(e) => {
                // Provider diagnostics stay in the logs.
                tracing::error!("Delivery failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            ApiError::UnreadableBody(e) => {
                tracing::warn!("Unreadable request body: {}", e.body_text());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            ApiError::MalformedPayload(e) => {
                tracing::warn!("Malformed request body: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

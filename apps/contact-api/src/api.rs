//! API handlers for the contact endpoint
//!
//! - `GET /health`
//! - `POST /api/contact`

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    routing::{get, post},
    Json, Router,
};
use contact_relay::{ContactRequest, SanitizedSubmission};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Routes without middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/contact", post(handle_contact))
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub success: bool,
}

/// Handler: POST /api/contact
///
/// Sanitize, validate, deliver once. Validation failures return before the
/// mailer is touched.
///
/// The body is parsed as JSON whatever its `Content-Type`, so a bare
/// `fetch` without headers (sent as `text/plain`) is accepted.
#[instrument(skip_all, fields(submission_id = %Uuid::new_v4()))]
pub async fn handle_contact(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let request = ContactRequest::from_slice(&body?)?;

    debug!("Validating submission");
    let submission = SanitizedSubmission::try_from(request).map_err(|e| {
        info!(reason = %e, "Submission rejected");
        e
    })?;

    state.mailer.deliver(&submission).await?;

    info!("Submission delivered");
    Ok(Json(ContactResponse { success: true }))
}

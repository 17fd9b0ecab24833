//! Submission transport
//!
//! [`HttpTransport`] posts the form as JSON to the contact endpoint. The
//! endpoint answers 200 on success and `{ "error": "..." }` otherwise.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::fields::FormFields;

/// Shown when the server gives no usable error message
pub const GENERIC_FAILURE: &str = "Failed to send message. Please try again.";

/// Why a submit did not go through
///
/// The display text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Could not reach the server: {0}")]
    Network(String),
}

/// Sends one payload to the server
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, payload: &FormFields) -> Result<(), SubmitError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// JSON-over-HTTP transport for `POST /api/contact`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Reuse an existing client (timeouts, proxies, ...)
    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, payload), fields(endpoint = %self.endpoint))]
    async fn send(&self, payload: &FormFields) -> Result<(), SubmitError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Submission accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        debug!(status = status.as_u16(), error = %message, "Submission rejected");
        Err(SubmitError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContactForm, Field, FormState};
    use axum::{http::StatusCode, routing::post, Json, Router};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Fake contact endpoint answering with a fixed status and body
    async fn spawn_endpoint(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();

        let app = Router::new().route(
            "/api/contact",
            post(move |Json(payload): Json<Value>| {
                let captured = captured.clone();
                let body = body.clone();
                async move {
                    captured.lock().unwrap().push(payload);
                    (status, Json(body))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/api/contact", addr), seen)
    }

    fn filled_form() -> ContactForm {
        let mut form = ContactForm::new();
        form.edit(Field::Name, "Jane Doe").unwrap();
        form.edit(Field::Email, "jane@example.com").unwrap();
        form.edit(Field::Message, "Hello").unwrap();
        form
    }

    #[tokio::test]
    async fn test_success_moves_form_to_submitted() {
        let (endpoint, seen) = spawn_endpoint(StatusCode::OK, json!({ "success": true })).await;
        let transport = HttpTransport::new(endpoint);
        let mut form = filled_form();

        let state = form.submit(&transport).await.unwrap();
        assert_eq!(state, &FormState::Submitted);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "organization": "",
                "message": "Hello"
            })
        );
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced() {
        let (endpoint, _) = spawn_endpoint(
            StatusCode::BAD_REQUEST,
            json!({ "error": "Invalid email address" }),
        )
        .await;
        let transport = HttpTransport::new(endpoint);

        let err = transport.send(filled_form().fields()).await.unwrap_err();
        assert_eq!(
            err,
            SubmitError::Rejected {
                status: 400,
                message: "Invalid email address".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unexpected_error_body_uses_generic_message() {
        let (endpoint, _) =
            spawn_endpoint(StatusCode::BAD_GATEWAY, json!({ "detail": "upstream" })).await;
        let transport = HttpTransport::new(endpoint);
        let mut form = filled_form();

        form.submit(&transport).await.unwrap();
        assert_eq!(form.error(), Some(GENERIC_FAILURE));
        assert_eq!(form.fields().name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(format!("http://{}/api/contact", addr));
        let err = transport.send(filled_form().fields()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Network(_)));
    }
}

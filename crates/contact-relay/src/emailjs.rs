//! EmailJS REST client
//!
//! Sends a validated submission through the EmailJS send endpoint
//! (https://api.emailjs.com/api/v1.0/email/send). The submission fields are
//! mapped onto the template variables `name`, `email`, `organization` and
//! `message`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::types::{DeliveryReceipt, SanitizedSubmission};
use crate::{EmailJsConfig, Mailer};

/// Template value used when the sender left `organization` blank
pub const ORGANIZATION_PLACEHOLDER: &str = "N/A";

/// Literal body EmailJS returns on success
const PLAIN_ACK: &str = "OK";

/// EmailJS send request payload
#[derive(Debug, Serialize)]
struct EmailJsPayload<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken")]
    access_token: &'a str,
    template_params: TemplateParams<'a>,
}

/// Variables substituted into the EmailJS template
#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    name: &'a str,
    email: &'a str,
    organization: &'a str,
    message: &'a str,
}

impl<'a> EmailJsPayload<'a> {
    fn new(config: &'a EmailJsConfig, submission: &'a SanitizedSubmission) -> Self {
        let organization = match submission.organization() {
            "" => ORGANIZATION_PLACEHOLDER,
            org => org,
        };

        Self {
            service_id: &config.service_id,
            template_id: &config.template_id,
            user_id: &config.public_key,
            access_token: &config.private_key,
            template_params: TemplateParams {
                name: submission.name(),
                email: submission.email(),
                organization,
                message: submission.message(),
            },
        }
    }
}

/// Normalize a 2xx reply body
///
/// The HTTP status already says the send was accepted, so a body that is
/// neither `OK` nor JSON is still a success.
pub fn normalize_ack(body: &str) -> DeliveryReceipt {
    if body == PLAIN_ACK {
        return DeliveryReceipt::acknowledged();
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(details) => DeliveryReceipt::with_details(details),
        Err(_) => DeliveryReceipt::with_message(body),
    }
}

/// EmailJS sender
pub struct EmailJsClient {
    http: reqwest::Client,
    config: EmailJsConfig,
}

impl EmailJsClient {
    /// Build a client whose every request is bounded by `config.timeout`
    pub fn new(config: EmailJsConfig) -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("contact-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DeliveryError::Transport)?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &EmailJsConfig {
        &self.config
    }

    fn transport_error(&self, err: reqwest::Error) -> DeliveryError {
        if err.is_timeout() {
            DeliveryError::Timeout(self.config.timeout)
        } else {
            DeliveryError::Transport(err)
        }
    }
}

#[async_trait]
impl Mailer for EmailJsClient {
    // The caller's span carries the submission id; sender details stay out of logs.
    #[instrument(skip_all, fields(endpoint = %self.config.endpoint))]
    async fn deliver(
        &self,
        submission: &SanitizedSubmission,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let payload = EmailJsPayload::new(&self.config, submission);

        debug!("Sending submission via EmailJS");

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "EmailJS rejected the send");
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let receipt = normalize_ack(&body);
        if receipt.message.is_some() {
            warn!(body = %body, "EmailJS accepted the send with an unrecognized reply");
        }

        info!(status = status.as_u16(), "Submission delivered via EmailJS");
        Ok(receipt)
    }
}

/// Delivery failures
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("EmailJS rejected the send ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("EmailJS did not answer within {0:?}")]
    Timeout(Duration),

    #[error("EmailJS request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

//! Contact Relay - validated contact-form submissions delivered through EmailJS
//!
//! This crate holds the server side of the contact pipeline:
//!
//! 1. **Sanitization** - every text field loses its `<` and `>` characters and
//!    surrounding whitespace ([`gate::sanitize`])
//! 2. **Validation** - `name`, `email` and `message` must be present and the
//!    email must look like `local@domain.tld` ([`gate`])
//! 3. **Delivery** - one POST to the EmailJS send endpoint, reply normalized
//!    into a [`DeliveryReceipt`] ([`emailjs::EmailJsClient`])
//!
//! ## Architecture
//!
//! ```text
//! Contact form → POST /api/contact → Gate → Mailer (this) → EmailJS → Inbox
//!                                     ↓
//!                              400 on bad input,
//!                              nothing leaves the process
//! ```
//!
//! Nothing is persisted. A submission is sanitized, validated, delivered at
//! most once and dropped. There is no retry: a failed send surfaces to the
//! caller immediately.
//!
//! ## Configuration
//!
//! | Variable              | Required | Default                                        |
//! |-----------------------|----------|------------------------------------------------|
//! | `EMAILJS_SERVICE_ID`  | yes      |                                                |
//! | `EMAILJS_TEMPLATE_ID` | yes      |                                                |
//! | `EMAILJS_PUBLIC_KEY`  | yes      |                                                |
//! | `EMAILJS_PRIVATE_KEY` | yes      |                                                |
//! | `EMAILJS_ENDPOINT`    | no       | `https://api.emailjs.com/api/v1.0/email/send`  |
//! | `EMAILJS_TIMEOUT_MS`  | no       | `10000`                                        |
//!
//! Load it once at startup with [`EmailJsConfig::from_env`] so a missing
//! secret stops the process before it accepts traffic.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

pub mod emailjs;
pub mod gate;
pub mod types;

pub use emailjs::{DeliveryError, EmailJsClient};
pub use gate::{is_valid_email, sanitize};
pub use types::{ContactRequest, DeliveryReceipt, SanitizedSubmission, ValidationError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// EmailJS REST send endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Upper bound on a single provider round trip
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const SERVICE_ID_VAR: &str = "EMAILJS_SERVICE_ID";
const TEMPLATE_ID_VAR: &str = "EMAILJS_TEMPLATE_ID";
const PUBLIC_KEY_VAR: &str = "EMAILJS_PUBLIC_KEY";
const PRIVATE_KEY_VAR: &str = "EMAILJS_PRIVATE_KEY";
const ENDPOINT_VAR: &str = "EMAILJS_ENDPOINT";
const TIMEOUT_VAR: &str = "EMAILJS_TIMEOUT_MS";

/// Anything that can hand a validated submission to a delivery provider
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Attempt delivery exactly once
    async fn deliver(
        &self,
        submission: &SanitizedSubmission,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Configuration for the EmailJS relay
#[derive(Clone)]
pub struct EmailJsConfig {
    /// EmailJS service the template belongs to
    pub service_id: String,

    /// Template whose variables receive the submission fields
    pub template_id: String,

    /// Public key (sent as `user_id`)
    pub public_key: String,

    /// Private key (sent as `accessToken`, required for server-side sends)
    pub private_key: String,

    /// Send endpoint
    pub endpoint: String,

    /// Request timeout for the send call
    pub timeout: Duration,
}

impl EmailJsConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let endpoint = match lookup(ENDPOINT_VAR).map(|v| v.trim().to_string()) {
            Some(value) if !value.is_empty() => {
                reqwest::Url::parse(&value).map_err(|_| ConfigError::Invalid {
                    key: ENDPOINT_VAR,
                    value: value.clone(),
                })?;
                value
            }
            _ => DEFAULT_ENDPOINT.to_string(),
        };

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::Invalid {
                    key: TIMEOUT_VAR,
                    value: raw,
                })?,
            None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };

        Ok(Self {
            service_id: required(SERVICE_ID_VAR)?,
            template_id: required(TEMPLATE_ID_VAR)?,
            public_key: required(PUBLIC_KEY_VAR)?,
            private_key: required(PRIVATE_KEY_VAR)?,
            endpoint,
            timeout,
        })
    }
}

// Keeps the private key out of logs.
impl fmt::Debug for EmailJsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailJsConfig")
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Deployment defects detected while loading configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (SERVICE_ID_VAR, "service_abc"),
            (TEMPLATE_ID_VAR, "template_xyz"),
            (PUBLIC_KEY_VAR, "public_123"),
            (PRIVATE_KEY_VAR, "private_456"),
        ]
    }

    #[test]
    fn test_config_defaults() {
        let config = EmailJsConfig::from_lookup(lookup_from(&complete())).unwrap();
        assert_eq!(config.service_id, "service_abc");
        assert_eq!(config.private_key, "private_456");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_missing_secret_is_reported_by_name() {
        for key in [SERVICE_ID_VAR, TEMPLATE_ID_VAR, PUBLIC_KEY_VAR, PRIVATE_KEY_VAR] {
            let pairs: Vec<_> = complete().into_iter().filter(|(k, _)| *k != key).collect();
            let err = EmailJsConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(key));
        }
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let pairs: Vec<_> = complete()
            .into_iter()
            .map(|(k, v)| if k == TEMPLATE_ID_VAR { (k, "   ") } else { (k, v) })
            .collect();
        let err = EmailJsConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing(TEMPLATE_ID_VAR));
    }

    #[test]
    fn test_timeout_override() {
        let mut pairs = complete();
        pairs.push((TIMEOUT_VAR, "2500"));
        let config = EmailJsConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        for raw in ["0", "soon", "-5"] {
            let mut pairs = complete();
            pairs.push((TIMEOUT_VAR, raw));
            let err = EmailJsConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: TIMEOUT_VAR, .. }));
        }
    }

    #[test]
    fn test_endpoint_override_must_be_a_url() {
        let mut pairs = complete();
        pairs.push((ENDPOINT_VAR, "http://127.0.0.1:9000/send"));
        let config = EmailJsConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:9000/send");

        let mut pairs = complete();
        pairs.push((ENDPOINT_VAR, "not a url"));
        let err = EmailJsConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENDPOINT_VAR, .. }));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = EmailJsConfig::from_lookup(lookup_from(&complete())).unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("service_abc"));
        assert!(!debug.contains("private_456"));
        assert!(debug.contains("<redacted>"));
    }
}

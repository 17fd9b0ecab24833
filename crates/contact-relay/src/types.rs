//! Submission types and request/response structures

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contact form body as received on the wire
///
/// Every field is optional at this stage. Absent fields and the falsy
/// values `null`, `false` and `0` are treated as empty text by the gate;
/// any other non-string value is a malformed body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default, deserialize_with = "falsy_or_text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "falsy_or_text")]
    pub email: Option<String>,

    /// Optional affiliation of the sender
    #[serde(default, deserialize_with = "falsy_or_text")]
    pub organization: Option<String>,

    #[serde(default, deserialize_with = "falsy_or_text")]
    pub message: Option<String>,
}

impl ContactRequest {
    /// Parse a raw request body, whatever its declared content type
    ///
    /// A JSON value that is not an object has no named fields, so every
    /// field counts as missing. A `null` body or invalid JSON is an error.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(body)? {
            value @ Value::Object(_) => serde_json::from_value(value),
            Value::Null => Err(de::Error::custom("request body is null")),
            _ => Ok(Self::default()),
        }
    }
}

fn falsy_or_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(None),
        _ => Err(de::Error::custom("expected a text value")),
    }
}

/// A submission that passed the gate
///
/// Only built by [`crate::gate`]. None of its fields contain `<` or `>`,
/// none carry surrounding whitespace, and `name`, `email` and `message` are
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSubmission {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) organization: String,
    pub(crate) message: String,
}

impl SanitizedSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Empty when the sender left it blank
    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Normalized provider acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Always true; failures are reported as errors instead
    pub success: bool,

    /// Raw reply text when it was neither `OK` nor JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Parsed reply when the provider answered with JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl DeliveryReceipt {
    /// Bare acknowledgement
    pub fn acknowledged() -> Self {
        Self {
            success: true,
            message: None,
            details: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::acknowledged()
        }
    }

    pub fn with_details(details: serde_json::Value) -> Self {
        Self {
            details: Some(details),
            ..Self::acknowledged()
        }
    }
}

/// Client input defects
///
/// The display text is what the client gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid email address")]
    InvalidEmail,
}

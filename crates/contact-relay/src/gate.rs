//! Validation and sanitization gate
//!
//! Runs once per submission at the server boundary, before any external
//! call. Steps, in order:
//!
//! 1. sanitize all four fields (missing → empty, strip `<`/`>`, trim)
//! 2. require `name`, `email` and `message`
//! 3. check the email is `local@domain.tld` shaped
//!
//! Stripping angle brackets only stops tag delimiters from reaching the
//! provider's template. Quotes and ampersands pass through untouched.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{ContactRequest, SanitizedSubmission, ValidationError};

lazy_static! {
    /// local@domain.tld, no DNS lookup, no RFC 5322 grammar
    static ref EMAIL_SHAPE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Remove every `<` and `>` and trim surrounding whitespace
pub fn sanitize(input: &str) -> String {
    let stripped: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    stripped.trim().to_string()
}

/// Check the `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

fn sanitize_field(field: Option<&str>) -> String {
    sanitize(field.unwrap_or_default())
}

impl TryFrom<ContactRequest> for SanitizedSubmission {
    type Error = ValidationError;

    fn try_from(request: ContactRequest) -> Result<Self, Self::Error> {
        let submission = SanitizedSubmission {
            name: sanitize_field(request.name.as_deref()),
            email: sanitize_field(request.email.as_deref()),
            organization: sanitize_field(request.organization.as_deref()),
            message: sanitize_field(request.message.as_deref()),
        };

        if submission.name.is_empty() || submission.email.is_empty() || submission.message.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }

        if !is_valid_email(&submission.email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(submission)
    }
}

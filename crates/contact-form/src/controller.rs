//! Form state machine

use tracing::{debug, warn};

use crate::fields::{Field, FormFields};
use crate::transport::{SubmitError, Transport};

/// Which of the three UI states the form is in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    /// Inputs are editable; `error` holds the last failed submit, if any
    Editing { error: Option<String> },
    /// Request in flight, submit disabled
    Submitting,
    /// Server accepted the message, inputs cleared
    Submitted,
}

/// Illegal transitions and client-side presence failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Please fill in the {0} field")]
    MissingRequired(Field),

    #[error("A submission is already in progress")]
    SubmitInProgress,

    #[error("The message was already sent")]
    AlreadySubmitted,

    #[error("No submission is in progress")]
    NotSubmitting,

    #[error("The message has not been sent yet")]
    NotSubmitted,
}

/// Contact form controller
#[derive(Debug, Clone)]
pub struct ContactForm {
    fields: FormFields,
    state: FormState,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            fields: FormFields::default(),
            state: FormState::Editing { error: None },
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Error to display under the form
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FormState::Editing { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    fn ensure_editing(&self) -> Result<(), FormError> {
        match self.state {
            FormState::Editing { .. } => Ok(()),
            FormState::Submitting => Err(FormError::SubmitInProgress),
            FormState::Submitted => Err(FormError::AlreadySubmitted),
        }
    }

    /// Update one input
    pub fn edit(&mut self, field: Field, value: impl Into<String>) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.fields.set(field, value);
        Ok(())
    }

    /// Update an input addressed by its markup name
    pub fn edit_named(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field = name.parse::<Field>()?;
        self.edit(field, value)
    }

    /// Enter `Submitting` and hand back the payload to send
    pub fn begin_submit(&mut self) -> Result<FormFields, FormError> {
        self.ensure_editing()?;

        if let Some(field) = self.fields.first_missing() {
            return Err(FormError::MissingRequired(field));
        }

        debug!("Contact form submitting");
        self.state = FormState::Submitting;
        Ok(self.fields.clone())
    }

    /// Leave `Submitting` with the outcome of the one request
    pub fn finish_submit(&mut self, outcome: Result<(), SubmitError>) -> Result<(), FormError> {
        if self.state != FormState::Submitting {
            return Err(FormError::NotSubmitting);
        }

        self.state = match outcome {
            Ok(()) => {
                debug!("Contact form submitted");
                self.fields.clear();
                FormState::Submitted
            }
            Err(e) => {
                warn!(error = %e, "Contact form submission failed");
                FormState::Editing {
                    error: Some(e.to_string()),
                }
            }
        };

        Ok(())
    }

    /// Submit through `transport`: one call, no retry
    pub async fn submit<T>(&mut self, transport: &T) -> Result<&FormState, FormError>
    where
        T: Transport + ?Sized,
    {
        let payload = self.begin_submit()?;
        let outcome = transport.send(&payload).await;
        self.finish_submit(outcome)?;
        Ok(&self.state)
    }

    /// Back to an empty form after a successful send
    pub fn reset(&mut self) -> Result<(), FormError> {
        if self.state != FormState::Submitted {
            return Err(FormError::NotSubmitted);
        }
        self.fields.clear();
        self.state = FormState::Editing { error: None };
        Ok(())
    }
}

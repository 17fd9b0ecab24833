//! Application state for the contact endpoint

use std::sync::Arc;

use anyhow::Result;
use contact_relay::{EmailJsClient, EmailJsConfig, Mailer};

/// Shared, read-only for the lifetime of the process
#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: EmailJsConfig) -> Result<Self> {
        let client = EmailJsClient::new(config)?;
        Ok(Self::with_mailer(Arc::new(client)))
    }

    pub fn with_mailer(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }
}

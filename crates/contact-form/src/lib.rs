//! Contact form controller
//!
//! Owns the client side of a contact submission: the four field values and
//! the three mutually exclusive UI states.
//!
//! ```text
//!            edit / fail                 success
//!   ┌──────────────────────┐   ┌─────────────────────────┐
//!   ▼                      │   │                         ▼
//! Editing ──begin_submit──▶ Submitting ──────────────▶ Submitted
//!   ▲                                                    │
//!   └──────────────────────── reset ─────────────────────┘
//! ```
//!
//! The server is the authority on validity. The only client check is the
//! presence test an HTML `required` attribute would perform.

pub mod controller;
pub mod fields;
pub mod transport;

pub use controller::{ContactForm, FormError, FormState};
pub use fields::{Field, FormFields};
pub use transport::{HttpTransport, SubmitError, Transport};

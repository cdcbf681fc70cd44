//! Contact form submission.
//!
//! A [`ContactMessage`] is validated and handed to a [`Mailer`] exactly
//! once: no retries, no queue, nothing stored. [`submit`] reduces the result
//! to a [`ContactOutcome`], logging the cause of any failure so the visitor
//! only ever sees a generic success or failure notice.

mod client;
mod error;
mod message;

pub use client::{HttpMailer, MailerConfig};
pub use error::{DeliveryError, MailError};
pub use message::ContactMessage;

/// Outbound mail service.
pub trait Mailer: Send + Sync {
    /// Deliver one message.
    fn send(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// What the visitor is told after submitting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactOutcome {
    Sent,
    Failed,
}

impl ContactOutcome {
    /// Short machine-readable form, as used in JSON responses.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// Validate and send a message, reducing the result to an outcome.
pub fn submit(mailer: &dyn Mailer, message: &ContactMessage) -> ContactOutcome {
    match mailer.send(message) {
        Ok(()) => {
            tracing::info!("Contact message sent");
            ContactOutcome::Sent
        }
        Err(MailError::Invalid(reason)) => {
            tracing::debug!(reason, "Contact message rejected by validation");
            ContactOutcome::Failed
        }
        Err(MailError::Delivery(cause)) => {
            tracing::warn!(error = %cause, "Contact message delivery failed");
            ContactOutcome::Failed
        }
    }
}

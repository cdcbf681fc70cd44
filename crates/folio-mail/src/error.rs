//! Error types for contact submission.

/// Error from validating or delivering a contact message.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The message failed validation.
    #[error("Invalid contact message: {0}")]
    Invalid(&'static str),

    /// The mail service could not be reached or refused the message.
    #[error("Mail delivery failed")]
    Delivery(#[from] DeliveryError),
}

/// Cause of a delivery failure.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Transport failure (connection refused, DNS, timeout).
    #[error("HTTP request failed")]
    Transport(#[from] ureq::Error),

    /// The service answered with a non-success status.
    #[error("HTTP error: {status} - {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
}

//! Contact message and validation.

use serde::{Deserialize, Serialize};

use crate::error::MailError;

/// Upper bound on the message body, in characters.
const MAX_MESSAGE_CHARS: usize = 5000;

/// A visitor's contact form submission.
///
/// Never stored; forwarded once to the mail service. Missing fields
/// deserialize as empty and are caught by [`ContactMessage::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self::new(self.name.trim(), self.email.trim(), self.message.trim())
    }

    /// Check that all fields are present and the address is well formed.
    pub fn validate(&self) -> Result<(), MailError> {
        if self.name.trim().is_empty() {
            return Err(MailError::Invalid("name is required"));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(MailError::Invalid("email address is not valid"));
        }
        if self.message.trim().is_empty() {
            return Err(MailError::Invalid("message is required"));
        }
        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(MailError::Invalid("message is too long"));
        }
        Ok(())
    }
}

/// Structural address check: `local@domain.tld`, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str, email: &str, body: &str) -> ContactMessage {
        ContactMessage::new(name, email, body)
    }

    #[test]
    fn test_valid_message() {
        assert!(message("Sam", "sam@example.com", "Hi!").validate().is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_allowed() {
        assert!(message(" Sam ", " sam@example.com ", " Hi ").validate().is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let err = message("  ", "sam@example.com", "Hi").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid contact message: name is required");

        let err = message("Sam", "sam@example.com", "\n").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid contact message: message is required");
    }

    #[test]
    fn test_message_too_long() {
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(message("Sam", "sam@example.com", &long).validate().is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@localhost"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@example."));
        assert!(!is_valid_email("a@exa..mple.com"));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[test]
    fn test_trimmed() {
        let trimmed = message(" Sam ", " s@e.io\n", " Hi ").trimmed();
        assert_eq!(trimmed, message("Sam", "s@e.io", "Hi"));
    }

    #[test]
    fn test_deserialize_from_json() {
        let parsed: ContactMessage =
            serde_json::from_str(r#"{"name":"Sam","email":"s@e.io","message":"Hi"}"#).unwrap();
        assert_eq!(parsed, message("Sam", "s@e.io", "Hi"));
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let msg: ContactMessage = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();

        assert_eq!(msg.email, "");
        assert!(matches!(msg.validate(), Err(MailError::Invalid(_))));
    }
}

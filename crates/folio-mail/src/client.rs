//! HTTP mail service client.
//!
//! Posts one JSON request per message to an EmailJS-compatible endpoint.

use std::time::Duration;

use serde::Serialize;
use ureq::Agent;

use crate::Mailer;
use crate::error::{DeliveryError, MailError};
use crate::message::ContactMessage;

/// Request timeout covering connect, send and response.
const DEFAULT_TIMEOUT: u64 = 10;

/// Endpoint and template identifiers for the mail service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailerConfig {
    /// Full URL of the send endpoint.
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    /// Public key, sent as `user_id`.
    pub public_key: String,
    /// Private key, sent as `accessToken` when set.
    pub private_key: Option<String>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: TemplateParams<'a>,
}

#[derive(Serialize)]
struct TemplateParams<'a> {
    from_name: &'a str,
    from_email: &'a str,
    message: &'a str,
}

/// Mailer backed by an HTTP mail service.
pub struct HttpMailer {
    agent: Agent,
    config: MailerConfig,
}

impl HttpMailer {
    #[must_use]
    pub fn new(config: MailerConfig) -> Self {
        Self::with_timeout(config, Duration::from_secs(DEFAULT_TIMEOUT))
    }

    #[must_use]
    pub fn with_timeout(config: MailerConfig, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, config }
    }

    fn request<'a>(&'a self, message: &'a ContactMessage) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: self.config.private_key.as_deref(),
            template_params: TemplateParams {
                from_name: &message.name,
                from_email: &message.email,
                message: &message.message,
            },
        }
    }
}

impl Mailer for HttpMailer {
    fn send(&self, message: &ContactMessage) -> Result<(), MailError> {
        let message = message.trimmed();
        message.validate()?;

        let response = self
            .agent
            .post(&self.config.endpoint)
            .header("Accept", "text/plain, application/json")
            .send_json(self.request(&message))
            .map_err(DeliveryError::from)?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response
                .into_body()
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(DeliveryError::Rejected { status, body }.into());
        }

        tracing::debug!(status, "Contact message delivered");
        Ok(())
    }
}

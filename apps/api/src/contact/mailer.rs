//! Email delivery. `SendGridMailer` is the only code that talks to the
//! provider; everything else goes through the `Mailer` trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Email delivery is not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A fully composed plain-text message.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
}

// ────────────────────────────────────────────────────────────────────────────
// SendGrid v3
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SendGridRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Address<'a>>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendGridErrors {
    errors: Vec<SendGridErrorBody>,
}

#[derive(Debug, Deserialize)]
struct SendGridErrorBody {
    message: String,
}

impl<'a> SendGridRequest<'a> {
    fn from_email(email: &'a OutgoingEmail) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![Address { email: &email.to }],
            }],
            from: Address { email: &email.from },
            reply_to: email.reply_to.as_deref().map(|e| Address { email: e }),
            subject: &email.subject,
            content: vec![Content {
                content_type: "text/plain",
                value: &email.text,
            }],
        }
    }
}

/// Delivers mail through the SendGrid v3 `mail/send` endpoint.
#[derive(Clone)]
pub struct SendGridMailer {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl SendGridMailer {
    pub fn new(api_key: Option<String>) -> Result<Self, MailerError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            endpoint: SENDGRID_API_URL.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| MailerError::NotConfigured("SENDGRID_API_KEY is not set".to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&SendGridRequest::from_email(email))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<SendGridErrors>(&body)
                .map(|e| {
                    e.errors
                        .into_iter()
                        .map(|err| err.message)
                        .collect::<Vec<_>>()
                        .join("; ")
                })
                .unwrap_or(body);
            return Err(MailerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("SendGrid accepted message to {} (status {status})", email.to);
        Ok(())
    }
}

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::EmailConfig;
use crate::contact::mailer::{Mailer, OutgoingEmail};
use crate::errors::AppError;

const DEFAULT_SUBJECT: &str = "New message";

/// Body of `POST /api/contact`. Every field is optional at the decoding stage
/// so missing fields are reported together as a validation error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub email_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
    pub success: bool,
}

/// A submission with every required field present.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub email_to: Option<String>,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ContactRequest {
    pub fn validate(&self) -> Result<ContactSubmission, AppError> {
        match (
            present(&self.first_name),
            present(&self.last_name),
            present(&self.email),
            present(&self.message),
        ) {
            (Some(first_name), Some(last_name), Some(email), Some(message)) => {
                Ok(ContactSubmission {
                    first_name,
                    last_name,
                    email,
                    subject: present(&self.subject),
                    message,
                    email_to: present(&self.email_to),
                })
            }
            (first_name, last_name, email, message) => {
                let missing: Vec<&str> = [
                    ("firstName", first_name.is_none()),
                    ("lastName", last_name.is_none()),
                    ("email", email.is_none()),
                    ("message", message.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, is_missing)| is_missing.then_some(name))
                .collect();
                Err(AppError::Validation(format!(
                    "Missing required fields: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

/// Where a recipient address came from, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientSource {
    Request,
    FallbackSetting,
    SenderAddress,
}

/// Picks the first non-blank address in precedence order:
/// the request's `emailTo`, then `CONTACT_TO_EMAIL`, then the sender address.
pub fn resolve_recipient(
    submission: &ContactSubmission,
    email: &EmailConfig,
) -> Option<(String, RecipientSource)> {
    [
        (submission.email_to.clone(), RecipientSource::Request),
        (email.fallback_to_email.clone(), RecipientSource::FallbackSetting),
        (email.from_email.clone(), RecipientSource::SenderAddress),
    ]
    .into_iter()
    .find_map(|(address, source)| {
        address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .map(|a| (a, source))
    })
}

pub fn compose(submission: &ContactSubmission, from: &str, to: &str) -> OutgoingEmail {
    let subject = submission.subject.as_deref().unwrap_or(DEFAULT_SUBJECT);
    let text = format!(
        "New contact form submission\n\n\
         Name: {} {}\n\
         Email: {}\n\
         Subject: {subject}\n\n\
         {}\n",
        submission.first_name, submission.last_name, submission.email, submission.message
    );

    OutgoingEmail {
        to: to.to_string(),
        from: from.to_string(),
        reply_to: Some(submission.email.clone()),
        subject: format!("Portfolio contact: {subject}"),
        text,
    }
}

/// Validates contact submissions and hands them to the configured mailer.
#[derive(Clone)]
pub struct ContactRelay {
    mailer: Arc<dyn Mailer>,
    email: EmailConfig,
}

impl ContactRelay {
    pub fn new(mailer: Arc<dyn Mailer>, email: EmailConfig) -> Self {
        Self { mailer, email }
    }

    pub async fn relay(&self, request: &ContactRequest) -> Result<ContactResponse, AppError> {
        let submission = request.validate()?;

        let Some(from) = self.email.from_email.as_deref() else {
            error!("Contact form submitted but CONTACT_FROM_EMAIL is not set");
            return Err(AppError::Configuration(
                "CONTACT_FROM_EMAIL is not set".to_string(),
            ));
        };
        let Some((to, source)) = resolve_recipient(&submission, &self.email) else {
            error!("Contact form submitted but no recipient address is configured");
            return Err(AppError::Configuration(
                "no recipient address configured".to_string(),
            ));
        };

        let email = compose(&submission, from, &to);
        self.mailer.send(&email).await?;

        info!("Contact message sent successfully to {to} (recipient from {source:?})");
        Ok(ContactResponse {
            message: "Message sent successfully".to_string(),
            success: true,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::contact::mailer::MailerError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every message; optionally fails with a provider status.
    #[derive(Default)]
    pub(crate) struct RecordingMailer {
        pub sent: Mutex<Vec<OutgoingEmail>>,
        pub fail_with: Option<u16>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
            if let Some(status) = self.fail_with {
                return Err(MailerError::Api {
                    status,
                    message: "provider detail".to_string(),
                });
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    pub(crate) fn configured_email() -> EmailConfig {
        EmailConfig {
            sendgrid_api_key: Some("test-key".to_string()),
            from_email: Some("site@example.com".to_string()),
            fallback_to_email: Some("owner@example.com".to_string()),
        }
    }

    fn jane() -> ContactRequest {
        ContactRequest {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            message: Some("hi".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_reports_all_missing_fields() {
        let request = ContactRequest {
            first_name: Some("Jane".to_string()),
            email: Some("   ".to_string()),
            ..Default::default()
        };
        match request.validate() {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Missing required fields: lastName, email, message");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_recipient_precedence() {
        let mut submission = jane().validate().unwrap();
        let mut email = configured_email();

        submission.email_to = Some("direct@example.com".to_string());
        assert_eq!(
            resolve_recipient(&submission, &email),
            Some(("direct@example.com".to_string(), RecipientSource::Request))
        );

        submission.email_to = None;
        assert_eq!(
            resolve_recipient(&submission, &email).map(|(_, s)| s),
            Some(RecipientSource::FallbackSetting)
        );

        email.fallback_to_email = None;
        assert_eq!(
            resolve_recipient(&submission, &email),
            Some(("site@example.com".to_string(), RecipientSource::SenderAddress))
        );

        email.from_email = None;
        assert_eq!(resolve_recipient(&submission, &email), None);
    }

    #[test]
    fn test_compose_defaults_subject_and_sets_reply_to() {
        let submission = jane().validate().unwrap();
        let email = compose(&submission, "site@example.com", "owner@example.com");
        assert_eq!(email.subject, "Portfolio contact: New message");
        assert_eq!(email.reply_to.as_deref(), Some("jane@x.com"));
        assert!(email.text.contains("Name: Jane Doe"));
        assert!(email.text.contains("hi"));
    }

    #[tokio::test]
    async fn test_relay_sends_to_resolved_recipient() {
        let mailer = Arc::new(RecordingMailer::default());
        let relay = ContactRelay::new(mailer.clone(), configured_email());

        let response = relay.relay(&jane()).await.unwrap();
        assert!(response.success);

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@example.com");
        assert_eq!(sent[0].from, "site@example.com");
    }

    #[tokio::test]
    async fn test_relay_without_sender_is_configuration_error() {
        let mailer = Arc::new(RecordingMailer::default());
        let mut email = configured_email();
        email.from_email = None;
        let relay = ContactRelay::new(mailer.clone(), email);

        assert!(matches!(
            relay.relay(&jane()).await,
            Err(AppError::Configuration(_))
        ));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_relay_maps_provider_errors() {
        for (status, bad_request) in [(400, true), (401, false), (403, false), (500, false)] {
            let mailer = Arc::new(RecordingMailer {
                fail_with: Some(status),
                ..Default::default()
            });
            let relay = ContactRelay::new(mailer, configured_email());
            let err = relay.relay(&jane()).await.unwrap_err();
            assert_eq!(
                matches!(err, AppError::DeliveryRejected(_)),
                bad_request,
                "status {status}"
            );
        }
    }
}

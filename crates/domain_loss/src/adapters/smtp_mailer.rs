//! SMTP Reminder Mailer Adapter
//!
//! Implements the `ReminderMailer` port against an SMTP relay using
//! STARTTLS. Reminders are HTML-only, matching what the notification
//! templates render.
//!
//! # Error Handling
//!
//! Transport errors are mapped to `PortError` variants:
//! - Bad recipient address -> `PortError::Validation`
//! - Message assembly failure -> `PortError::Internal`
//! - Relay/connection failure -> `PortError::Connection`
//!
//! All of these are isolated per event by the reminder scanner.

use async_trait::async_trait;
use chrono::Utc;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Instant;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};

use crate::ports::{Recipient, ReminderMailer};
use crate::reminder::ReminderEmail;

/// Connection settings for the SMTP relay
#[derive(Debug, Clone)]
pub struct SmtpMailerConfig {
    /// Relay hostname (e.g., "smtp.sendgrid.net")
    pub host: String,
    /// Relay port, typically 587 for STARTTLS
    pub port: u16,
    /// Relay username
    pub username: String,
    /// Relay password
    pub password: String,
    /// From address for all reminders (e.g., "ClaimReady <no-reply@example.com>")
    pub from_address: String,
}

/// SMTP implementation of the `ReminderMailer` port
pub struct SmtpReminderMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpReminderMailer {
    /// Builds a mailer from relay settings
    ///
    /// Fails when the relay hostname or from address is malformed; no
    /// connection is attempted until the first send.
    pub fn new(config: &SmtpMailerConfig) -> Result<Self, PortError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| PortError::Connection {
                message: format!("invalid SMTP relay {}: {}", config.host, e),
                source: Some(Box::new(e)),
            })?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .port(config.port)
            .build();

        let from: Mailbox = config
            .from_address
            .parse()
            .map_err(|e| PortError::validation(format!("invalid from address: {}", e)))?;

        Ok(Self { transport, from })
    }
}

impl DomainPort for SmtpReminderMailer {}

#[async_trait]
impl ReminderMailer for SmtpReminderMailer {
    async fn send(&self, recipient: &Recipient, email: &ReminderEmail) -> Result<(), PortError> {
        let to: Mailbox = match &recipient.display_name {
            Some(name) => format!("{} <{}>", name, recipient.email).parse(),
            None => recipient.email.parse(),
        }
        .map_err(|e| PortError::validation(format!("invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| PortError::Internal {
                message: format!("failed to assemble reminder message: {}", e),
                source: Some(Box::new(e)),
            })?;

        self.transport
            .send(message)
            .await
            .map_err(|e| PortError::Connection {
                message: format!("SMTP send failed: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(())
    }
}

#[async_trait]
impl HealthCheckable for SmtpReminderMailer {
    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        let (status, message) = match self.transport.test_connection().await {
            Ok(true) => (AdapterHealth::Healthy, None),
            Ok(false) => (
                AdapterHealth::Unhealthy,
                Some("SMTP relay refused connection".to_string()),
            ),
            Err(e) => (
                AdapterHealth::Unhealthy,
                Some(format!("SMTP connection failed: {}", e)),
            ),
        };

        HealthCheckResult {
            adapter_id: "smtp-reminder-mailer".to_string(),
            status,
            latency_ms: started.elapsed().as_millis() as u64,
            message,
            checked_at: Utc::now(),
        }
    }
}

//! SMTP alert transport using lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use blog_core::config::mailer::MailerConfig;
use blog_core::error::AppError;
use blog_core::result::AppResult;

use crate::Mailer;

/// Mailer backed by an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a new SMTP mailer from configuration.
    pub fn new(config: &MailerConfig) -> AppResult<Self> {
        let transport = if config.use_tls {
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| {
                    AppError::configuration(format!("Failed to create SMTP relay: {e}"))
                })?
                .credentials(creds)
                .port(config.port)
                .build()
        } else if !config.username.is_empty() {
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .credentials(creds)
                .port(config.port)
                .build()
        } else {
            // No auth, for a local Mailpit/Mailhog
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .build()
        };

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse::<Mailbox>()
            .map_err(|e| AppError::configuration(format!("Invalid sender address: {e}")))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_alert(&self, recipient: &str, subject: &str, body: &str) -> AppResult<()> {
        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| AppError::validation(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| AppError::internal(format!("Failed to build message: {e}")))?;

        self.transport.send(message).await.map_err(|e| {
            AppError::external_service(format!("SMTP send to '{recipient}' failed: {e}"))
        })?;

        tracing::debug!(recipient, subject, "Alert sent via SMTP");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

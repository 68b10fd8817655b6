//! # blog-mailer
//!
//! Outbound alert delivery for Miniblog. The dispatcher talks to the
//! [`Mailer`] trait only; concrete transports are SMTP (via `lettre`),
//! a log-only transport for development, and a capturing mock for tests.

pub mod log;
pub mod mock;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;

use blog_core::config::mailer::MailerConfig;
use blog_core::error::AppError;
use blog_core::result::AppResult;

pub use log::LogMailer;
pub use mock::{MockMailer, SentAlert};
pub use smtp::SmtpMailer;

/// Delivery collaborator for outbound alerts.
///
/// Sends are best-effort from the caller's perspective: the dispatcher
/// logs a failure and moves on, it never retries through this trait.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one alert to a recipient contact address.
    async fn send_alert(&self, recipient: &str, subject: &str, body: &str) -> AppResult<()>;

    /// Transport name, for logging.
    fn name(&self) -> &'static str;
}

/// Build the configured mailer transport.
pub fn from_config(config: &MailerConfig) -> AppResult<Arc<dyn Mailer>> {
    match config.transport.as_str() {
        "smtp" => Ok(Arc::new(SmtpMailer::new(config)?)),
        "log" => Ok(Arc::new(LogMailer::new())),
        other => Err(AppError::configuration(format!(
            "Unknown mailer transport: '{other}'. Expected one of: smtp, log"
        ))),
    }
}

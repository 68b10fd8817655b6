//! Log-only alert transport.
//!
//! The development default: alerts are written to the application log
//! instead of being sent anywhere.

use async_trait::async_trait;

use blog_core::result::AppResult;

use crate::Mailer;

/// Mailer that logs alerts instead of delivering them.
#[derive(Debug, Default)]
pub struct LogMailer;

impl LogMailer {
    /// Create a new log mailer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_alert(&self, recipient: &str, subject: &str, body: &str) -> AppResult<()> {
        tracing::info!(recipient, subject, body, "Sending email notification");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

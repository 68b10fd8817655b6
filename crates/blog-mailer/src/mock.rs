//! Mock alert transport that captures sent mail for tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use blog_core::error::AppError;
use blog_core::result::AppResult;

use crate::Mailer;

/// One captured alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentAlert {
    /// The recipient contact address.
    pub recipient: String,
    /// The alert subject.
    pub subject: String,
    /// The alert body.
    pub body: String,
}

/// Mailer that records alerts instead of sending them.
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentAlert>>>,
    should_fail: bool,
}

impl MockMailer {
    /// Create a new capturing mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose every send fails.
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail: true,
        }
    }

    /// All captured alerts, in send order.
    pub async fn sent(&self) -> Vec<SentAlert> {
        self.sent.lock().await.clone()
    }

    /// Number of captured alerts.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Check whether an alert was sent to the given address.
    pub async fn was_sent_to(&self, recipient: &str) -> bool {
        self.sent
            .lock()
            .await
            .iter()
            .any(|alert| alert.recipient == recipient)
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_alert(&self, recipient: &str, subject: &str, body: &str) -> AppResult<()> {
        if self.should_fail {
            return Err(AppError::external_service("mock mailer configured to fail"));
        }
        self.sent.lock().await.push(SentAlert {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

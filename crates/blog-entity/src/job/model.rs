//! Job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::JobStatus;

/// A queued unit of deferred work.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique job identifier.
    pub id: Uuid,
    /// Job type tag (e.g., `"post_published"`).
    pub job_type: String,
    /// Queue name.
    pub queue: String,
    /// Job-specific payload (JSON).
    pub payload: serde_json::Value,
    /// Current job status.
    pub status: JobStatus,
    /// Number of delivery attempts so far.
    pub attempts: i32,
    /// Maximum allowed delivery attempts.
    pub max_attempts: i32,
    /// Error message from the most recent failure.
    pub error_message: Option<String>,
    /// Result data recorded on completion (JSON).
    pub result: Option<serde_json::Value>,
    /// When the job was enqueued.
    pub enqueued_at: DateTime<Utc>,
    /// When the current worker claimed the job.
    pub claimed_at: Option<DateTime<Utc>>,
    /// Worker that claimed the job.
    pub claimed_by: Option<String>,
    /// When the job was acknowledged.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Check if the retry budget is spent.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

/// Data required to enqueue a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    /// Job type tag.
    pub job_type: String,
    /// Queue name.
    pub queue: String,
    /// Job-specific payload.
    pub payload: serde_json::Value,
    /// Maximum delivery attempts.
    pub max_attempts: i32,
}

//! Job status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a queued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting to be claimed by a worker.
    Pending,
    /// Claimed by a worker. Becomes eligible for redelivery once the
    /// visibility timeout elapses without an acknowledgement.
    Running,
    /// Acknowledged successfully.
    Completed,
    /// Dead-lettered: retries exhausted or the failure was permanent.
    /// Held for operator inspection, never retried automatically.
    Dead,
}

impl JobStatus {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Dead)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Dead => "dead",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

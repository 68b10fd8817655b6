//! Typed job payload definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed payloads for known job types.
///
/// Payloads reference entities by identifier only; workers re-fetch
/// current state at processing time instead of trusting a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job_type")]
pub enum JobPayload {
    /// A post transitioned from draft to published.
    #[serde(rename = "post_published")]
    PostPublished {
        /// The published post.
        post_id: Uuid,
    },
    /// Periodic queue upkeep: dead-letter sweep and completed-job purge.
    #[serde(rename = "queue_maintenance")]
    QueueMaintenance,
}

impl JobPayload {
    /// The job type tag this payload serializes under.
    pub fn job_type(&self) -> &'static str {
        match self {
            Self::PostPublished { .. } => "post_published",
            Self::QueueMaintenance => "queue_maintenance",
        }
    }
}

//! Queue maintenance job: dead-letter sweep and completed-job purge.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;

use blog_database::repositories::job::JobRepository;
use blog_entity::job::model::Job;

use crate::executor::{JobExecutionError, JobHandler};

/// Handles `queue_maintenance` jobs.
pub struct QueueMaintenanceHandler {
    /// Job repository.
    job_repo: Arc<JobRepository>,
    /// Visibility timeout used to recognize abandoned claims.
    visibility_timeout_seconds: u64,
    /// Days to keep completed jobs.
    completed_retention_days: i64,
}

impl QueueMaintenanceHandler {
    /// Create a new maintenance handler.
    pub fn new(
        job_repo: Arc<JobRepository>,
        visibility_timeout_seconds: u64,
        completed_retention_days: i64,
    ) -> Self {
        Self {
            job_repo,
            visibility_timeout_seconds,
            completed_retention_days,
        }
    }
}

#[async_trait]
impl JobHandler for QueueMaintenanceHandler {
    fn job_type(&self) -> &'static str {
        "queue_maintenance"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        // Jobs whose worker crashed on the final attempt are invisible to
        // the claim query; move them to the dead-letter state and report
        // each one for operator attention.
        let swept = self
            .job_repo
            .sweep_exhausted(self.visibility_timeout_seconds)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Dead-letter sweep failed: {e}")))?;

        for job in &swept {
            tracing::error!(
                job_id = %job.id,
                job_type = %job.job_type,
                attempts = job.attempts,
                error = job.error_message.as_deref().unwrap_or("unknown"),
                "Job dead-lettered; operator attention required"
            );
        }

        let cutoff = Utc::now() - Duration::days(self.completed_retention_days);
        let purged = self
            .job_repo
            .purge_completed_before(cutoff)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Completed purge failed: {e}")))?;

        tracing::info!(
            swept = swept.len(),
            purged,
            "Queue maintenance finished"
        );

        Ok(Some(serde_json::json!({
            "swept_to_dead": swept.len(),
            "purged_completed": purged,
            "retention_days": self.completed_retention_days,
        })))
    }
}

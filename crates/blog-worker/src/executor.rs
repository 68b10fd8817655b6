//! Job executor: dispatches claimed jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use blog_core::error::AppError;
use blog_entity::job::model::Job;

/// Trait for job handler implementations.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// The job type this handler processes.
    fn job_type(&self) -> &'static str;

    /// Execute the job. The returned value is recorded on the job row.
    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from job execution, classified by how the runner should react.
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure. Dead-letter immediately, never redeliver.
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure. Release for redelivery until attempts run out.
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Infrastructure error (database, etc.). Treated like a transient
    /// failure for retry purposes.
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl JobExecutionError {
    /// Whether the runner may redeliver after this failure.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Permanent(_))
    }
}

/// Dispatches jobs to the appropriate handler based on `job_type`.
#[derive(Default)]
pub struct JobExecutor {
    /// Registered job handlers by type.
    handlers: HashMap<&'static str, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create a new, empty executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler.
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type();
        tracing::info!(job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    /// Execute a job by dispatching to the handler for its type.
    ///
    /// A job whose type has no handler is a permanent failure: redelivery
    /// cannot fix it.
    pub async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let handler = self.handlers.get(job.job_type.as_str()).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job type '{}'",
                job.job_type
            ))
        })?;

        handler.execute(job).await
    }

    /// Check if a handler is registered for a job type.
    pub fn has_handler(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }

    /// The registered job types.
    pub fn registered_types(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }
}

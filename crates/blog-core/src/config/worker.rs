//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent job processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in seconds between job queue polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Seconds a claimed job may run before it becomes eligible for
    /// redelivery to another worker.
    #[serde(default = "default_visibility_timeout")]
    pub visibility_timeout_seconds: u64,
    /// Default maximum delivery attempts before a job is dead-lettered.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i32,
    /// Days to keep completed jobs before the maintenance sweep purges them.
    #[serde(default = "default_completed_retention")]
    pub completed_retention_days: i64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: default_concurrency(),
            poll_interval_seconds: default_poll_interval(),
            visibility_timeout_seconds: default_visibility_timeout(),
            max_attempts: default_max_attempts(),
            completed_retention_days: default_completed_retention(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    5
}

fn default_visibility_timeout() -> u64 {
    300
}

fn default_max_attempts() -> i32 {
    5
}

fn default_completed_retention() -> i64 {
    7
}

//! # blog-worker
//!
//! Background job processing for Miniblog. This crate provides:
//! - The durable job queue abstraction over the jobs table
//! - A worker runner that polls for and executes queued jobs
//! - A job executor that dispatches jobs to the correct handler
//! - The publish-notification dispatcher and queue maintenance handlers
//! - A cron scheduler enqueuing periodic maintenance

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use queue::JobQueue;
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;

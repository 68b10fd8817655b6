//! Miniblog worker daemon.
//!
//! Main entry point: wires configuration, database, mailer, and the job
//! processing pipeline together, then runs the worker until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use blog_core::config::AppConfig;
use blog_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("MINIBLOG_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Worker error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Miniblog worker v{}", env!("CARGO_PKG_VERSION"));

    // Database connection and migrations
    let db = blog_database::DatabasePool::connect(&config.database).await?;
    blog_database::migration::run_migrations(db.pool()).await?;

    // Repositories
    let post_repo = Arc::new(blog_database::repositories::PostRepository::new(
        db.pool().clone(),
    ));
    let user_repo = Arc::new(blog_database::repositories::UserRepository::new(
        db.pool().clone(),
    ));
    let notification_repo = Arc::new(blog_database::repositories::NotificationRepository::new(
        db.pool().clone(),
    ));
    let job_repo = Arc::new(blog_database::repositories::JobRepository::new(
        db.pool().clone(),
    ));

    // Outbound delivery collaborator
    let mailer = blog_mailer::from_config(&config.mailer)?;
    tracing::info!(transport = mailer.name(), "Mailer initialized");

    // Queue and executor
    let worker_id = format!("worker-{}", uuid::Uuid::new_v4());
    let queue = Arc::new(blog_worker::JobQueue::new(
        Arc::clone(&job_repo),
        worker_id.clone(),
        &config.worker,
    ));

    let mut executor = blog_worker::executor::JobExecutor::new();
    executor.register(Arc::new(blog_worker::jobs::PostPublishedHandler::new(
        Arc::clone(&post_repo),
        Arc::clone(&user_repo),
        Arc::clone(&notification_repo),
        mailer,
        Duration::from_secs(config.mailer.send_timeout_seconds),
    )));
    executor.register(Arc::new(blog_worker::jobs::QueueMaintenanceHandler::new(
        Arc::clone(&job_repo),
        config.worker.visibility_timeout_seconds,
        config.worker.completed_retention_days,
    )));
    let executor = Arc::new(executor);

    // Periodic maintenance
    let scheduler = blog_worker::CronScheduler::new(Arc::clone(&queue)).await?;
    scheduler.register_default_tasks().await?;
    scheduler.start().await?;

    // Worker loop with graceful shutdown
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let runner = blog_worker::WorkerRunner::new(
        Arc::clone(&queue),
        executor,
        config.worker.clone(),
        worker_id,
    );

    let runner_handle = tokio::spawn(async move {
        runner.run(cancel_rx).await;
    });

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown signal: {e}")))?;
    tracing::info!("Shutdown signal received");

    let _ = cancel_tx.send(true);
    let _ = runner_handle.await;

    scheduler.shutdown().await?;
    db.close().await;

    tracing::info!("Miniblog worker stopped");
    Ok(())
}

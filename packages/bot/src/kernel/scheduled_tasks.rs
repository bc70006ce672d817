//! Scheduled runs using tokio-cron-scheduler.
//!
//! `bot run` is meant to be triggered by an external scheduler. When no such
//! scheduler is available, `bot schedule` keeps a process alive and fires a
//! run on a cron expression instead.
//!
//! ```text
//! Scheduler (RUN_SCHEDULE)
//!     │
//!     └─► RunOrchestrator::run_once()
//!             └─► select → resolve → post → record → commit
//! ```

use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::runs::RunOrchestrator;

/// Start the cron job that runs the bot
pub async fn start_scheduler(orchestrator: Arc<RunOrchestrator>, schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let run_job = Job::new_async(schedule, move |_uuid, _lock| {
        let orchestrator = orchestrator.clone();
        Box::pin(async move {
            let report = orchestrator.run_once().await;
            if let Some(err) = &report.error {
                tracing::error!(attempts = report.attempts, "Scheduled run failed: {}", err);
            }
        })
    })?;

    scheduler.add(run_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule, "Scheduled runs started");
    Ok(scheduler)
}

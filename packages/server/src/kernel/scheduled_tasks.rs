//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! The one scheduled task here is the periodic full badge-counter rebuild:
//! badge allocation is read-then-write with no mutual exclusion, so counters
//! can drift; the nightly rebuild recomputes them from the profiles table.

use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::staff::activities::{reconcile_badge_counters, ReconcileMode};
use crate::kernel::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: Arc<ServerDeps>, schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let reconcile_deps = deps.clone();
    let reconcile_job = Job::new_async(schedule, move |_uuid, _lock| {
        let deps = reconcile_deps.clone();
        Box::pin(async move {
            if let Err(e) = reconcile_badge_counters(ReconcileMode::Full, &deps).await {
                tracing::error!("Scheduled badge reconciliation failed: {}", e);
            }
        })
    })?;

    scheduler.add(reconcile_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (badge reconciliation: {})", schedule);
    Ok(scheduler)
}

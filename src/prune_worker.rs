// Background worker: delete trend samples older than database.retention_days.
// Runs every prune_interval_secs until the shutdown signal fires.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::oneshot;
use tracing::{info, instrument, warn};

use crate::history_repo::HistoryRepo;

#[derive(Debug, Clone)]
pub struct PruneWorkerConfig {
    pub retention_days: u32,
    pub prune_interval_secs: u64,
}

/// Spawns the prune worker. Returns a join handle; the task ends when `shutdown_rx` fires.
pub fn spawn(
    repo: Arc<HistoryRepo>,
    config: PruneWorkerConfig,
    shutdown_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        run(repo, config, shutdown_rx).await;
    })
}

#[instrument(skip(repo, shutdown_rx), fields(interval_secs = config.prune_interval_secs))]
async fn run(repo: Arc<HistoryRepo>, config: PruneWorkerConfig, mut shutdown_rx: oneshot::Receiver<()>) {
    let mut interval = tokio::time::interval(Duration::from_secs(config.prune_interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = run_one_prune(&repo, config.retention_days, Utc::now()).await {
                    warn!(error = %e, "prune tick failed");
                }
            }
            _ = &mut shutdown_rx => {
                info!("prune worker stopped");
                break;
            }
        }
    }
}

/// Deletes samples older than `retention_days` before `now`. Used by the worker loop and tests.
pub async fn run_one_prune(
    repo: &HistoryRepo,
    retention_days: u32,
    now: DateTime<Utc>,
) -> anyhow::Result<u64> {
    let cutoff = now - TimeDelta::days(retention_days.into());
    let removed = repo.prune_samples_before(cutoff).await?;
    if removed > 0 {
        info!(removed, %cutoff, "pruned trend samples");
    }
    Ok(removed)
}

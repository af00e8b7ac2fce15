// Prune worker tests: retention cutoff and shutdown

mod common;

use chrono::{Duration, TimeZone, Utc};
use common::*;
use std::sync::Arc;
use trendagg::backend::TrendBackend;
use trendagg::history_repo::TrendSample;
use trendagg::models::{HistogramTrendRequest, ParameterIndexPair};
use trendagg::prune_worker::{self, PruneWorkerConfig};

#[tokio::test]
async fn run_one_prune_keeps_samples_inside_retention() {
    let (_dir, repo) = temp_repo().await;
    let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    repo.save_samples(
        element(),
        &[
            TrendSample::standalone(STANDALONE_PID, now - Duration::days(40), 1.0),
            TrendSample::standalone(STANDALONE_PID, now - Duration::days(31), 2.0),
            TrendSample::standalone(STANDALONE_PID, now - Duration::days(5), 3.0),
        ],
    )
    .await
    .unwrap();

    let removed = prune_worker::run_one_prune(&repo, 30, now).await.unwrap();
    assert_eq!(removed, 2);

    let response = repo
        .histogram_trend(&HistogramTrendRequest {
            element: element(),
            start_time: now - Duration::days(60),
            end_time: now,
            parameters: vec![ParameterIndexPair::new(STANDALONE_PID, None)],
        })
        .await
        .unwrap();
    let stats = response.trend_statistics.unwrap();
    let kept = &stats[&ParameterIndexPair::new(STANDALONE_PID, None).key()];
    assert_eq!(kept.minimum, 3.0);
    assert_eq!(kept.maximum, 3.0);
}

#[tokio::test]
async fn run_one_prune_on_empty_history_removes_nothing() {
    let (_dir, repo) = temp_repo().await;
    let removed = prune_worker::run_one_prune(&repo, 1, Utc::now()).await.unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn worker_prunes_on_first_tick_and_stops_on_shutdown() {
    let (_dir, repo) = temp_repo().await;
    repo.save_samples(
        element(),
        &[TrendSample::standalone(STANDALONE_PID, Utc::now() - Duration::days(90), 1.0)],
    )
    .await
    .unwrap();
    let repo = Arc::new(repo);

    let (tx, rx) = tokio::sync::oneshot::channel();
    let handle = prune_worker::spawn(
        repo.clone(),
        PruneWorkerConfig {
            retention_days: 30,
            prune_interval_secs: 3600,
        },
        rx,
    );
    // The first interval tick completes immediately.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    tx.send(()).unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("worker did not stop")
        .unwrap();

    let removed = repo.prune_samples_before(Utc::now()).await.unwrap();
    assert_eq!(removed, 0);
}

// SQLite trend history. element_protocol holds one wincode ProtocolDefinition per element;
// trend_samples holds raw values, summarised on request into TrendStatistics.

mod blob;
pub mod statistics;

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::instrument;

use crate::backend::TrendBackend;
use crate::error::BackendError;
use crate::models::{
    ElementRef, HistogramTrendRequest, HistogramTrendResponse, ProtocolDefinition,
};

/// One raw trended value. `index` is empty for standalone parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSample {
    pub parameter_id: i32,
    #[serde(default)]
    pub index: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl TrendSample {
    pub fn standalone(parameter_id: i32, timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            parameter_id,
            index: String::new(),
            timestamp,
            value,
        }
    }

    pub fn indexed(
        parameter_id: i32,
        index: impl Into<String>,
        timestamp: DateTime<Utc>,
        value: f64,
    ) -> Self {
        Self {
            parameter_id,
            index: index.into(),
            timestamp,
            value,
        }
    }
}

pub struct HistoryRepo {
    pool: SqlitePool,
}

impl HistoryRepo {
    /// Connect to SQLite at `path`, create parent dir and DB if missing, enable WAL + pragmas.
    pub async fn connect(
        path: &str,
        max_pool_size: u32,
        busy_timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(busy_timeout_secs))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS element_protocol (
                source_system_id INTEGER NOT NULL,
                element_id INTEGER NOT NULL,
                data BLOB NOT NULL,
                PRIMARY KEY (source_system_id, element_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trend_samples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_system_id INTEGER NOT NULL,
                element_id INTEGER NOT NULL,
                parameter_id INTEGER NOT NULL,
                idx TEXT NOT NULL DEFAULT '',
                created_at INTEGER NOT NULL,
                value REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_trend_samples_key ON trend_samples(source_system_id, element_id, parameter_id, idx, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self, protocol), fields(repo = "history", operation = "save_protocol", element = %element))]
    pub async fn save_protocol(
        &self,
        element: ElementRef,
        protocol: &ProtocolDefinition,
    ) -> anyhow::Result<()> {
        let data = blob::with_version_prefix(
            blob::BLOB_VERSION_PROTOCOL,
            wincode::serialize(protocol).map_err(|e| anyhow::anyhow!("wincode: {}", e))?,
        );
        sqlx::query(
            "INSERT OR REPLACE INTO element_protocol (source_system_id, element_id, data) VALUES ($1, $2, $3)",
        )
        .bind(element.source_system_id)
        .bind(element.element_id)
        .bind(&data)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self, samples), fields(repo = "history", operation = "save_samples", element = %element, samples_count = samples.len()))]
    pub async fn save_samples(
        &self,
        element: ElementRef,
        samples: &[TrendSample],
    ) -> anyhow::Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for s in samples {
            sqlx::query(
                "INSERT INTO trend_samples (source_system_id, element_id, parameter_id, idx, created_at, value) VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(element.source_system_id)
            .bind(element.element_id)
            .bind(s.parameter_id)
            .bind(&s.index)
            .bind(s.timestamp.timestamp_millis())
            .bind(s.value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Delete samples older than `cutoff`. Returns the number of rows removed.
    #[instrument(skip(self), fields(repo = "history", operation = "prune_samples_before"))]
    pub async fn prune_samples_before(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let r = sqlx::query("DELETE FROM trend_samples WHERE created_at < $1")
            .bind(cutoff.timestamp_millis())
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }

    /// Raw values of one parameter/index in [from, to). The end bound is exclusive.
    async fn sample_values(
        &self,
        element: ElementRef,
        parameter_id: i32,
        index: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<f64>, BackendError> {
        let values = sqlx::query_scalar::<_, f64>(
            "SELECT value FROM trend_samples
             WHERE source_system_id = $1 AND element_id = $2 AND parameter_id = $3 AND idx = $4
               AND created_at >= $5 AND created_at < $6
             ORDER BY created_at ASC",
        )
        .bind(element.source_system_id)
        .bind(element.element_id)
        .bind(parameter_id)
        .bind(index)
        .bind(from.timestamp_millis())
        .bind(to.timestamp_millis())
        .fetch_all(&self.pool)
        .await?;
        Ok(values)
    }
}

impl TrendBackend for HistoryRepo {
    #[instrument(skip(self), fields(repo = "history", operation = "element_protocol", element = %element))]
    async fn element_protocol(
        &self,
        element: ElementRef,
    ) -> Result<Option<ProtocolDefinition>, BackendError> {
        let row = sqlx::query(
            "SELECT data FROM element_protocol WHERE source_system_id = $1 AND element_id = $2",
        )
        .bind(element.source_system_id)
        .bind(element.element_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let data: Vec<u8> = row.try_get("data")?;
        let payload = blob::blob_payload(&data, blob::BLOB_VERSION_PROTOCOL).ok_or_else(|| {
            BackendError::CorruptBlob {
                element,
                message: "unknown blob version".into(),
            }
        })?;
        let protocol = wincode::deserialize(payload).map_err(|e| BackendError::CorruptBlob {
            element,
            message: e.to_string(),
        })?;
        Ok(Some(protocol))
    }

    /// Statistics per requested pair over `[start_time, end_time)`: a sample stamped exactly at
    /// `end_time` is not counted. Pairs with no samples in the window are left out of the map.
    #[instrument(
        skip(self, request),
        fields(repo = "history", operation = "histogram_trend", element = %request.element, pairs = request.parameters.len())
    )]
    async fn histogram_trend(
        &self,
        request: &HistogramTrendRequest,
    ) -> Result<HistogramTrendResponse, BackendError> {
        let mut trend_statistics = HashMap::with_capacity(request.parameters.len());
        for pair in &request.parameters {
            let values = self
                .sample_values(
                    request.element,
                    pair.parameter_id,
                    pair.index.as_deref().unwrap_or(""),
                    request.start_time,
                    request.end_time,
                )
                .await?;
            if let Some(stats) = statistics::summarize(&values) {
                trend_statistics.insert(pair.key(), stats);
            }
        }
        Ok(HistogramTrendResponse {
            trend_statistics: Some(trend_statistics),
        })
    }
}

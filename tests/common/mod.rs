// Shared test helpers
#![allow(dead_code)]

use trendagg::history_repo::HistoryRepo;
use trendagg::models::*;
use tempfile::TempDir;

pub const STANDALONE_PID: i32 = 100;
pub const COLUMN_PID: i32 = 1002;
pub const TABLE_PID: i32 = 1000;

pub fn element() -> ElementRef {
    ElementRef::new(1, 2)
}

pub fn protocol() -> ProtocolDefinition {
    ProtocolDefinition {
        name: "Generic Trend Device".into(),
        version: "1.0.0.1".into(),
        parameters: vec![
            ParameterInfo::standalone(STANDALONE_PID, "Temperature"),
            ParameterInfo::column(COLUMN_PID, "Port load", TABLE_PID).with_format(Some(2), "%"),
        ],
    }
}

/// Distinct value per field, so a cross-mapping can't go unnoticed.
pub fn bundle() -> TrendStatistics {
    TrendStatistics {
        minimum: 1.0,
        maximum: 9.0,
        average: 5.0,
        mean_deviation: 2.0,
        standard_deviation: 3.0,
    }
}

pub fn raw_args(parameter_id: i32, sub_index: Option<&str>, aggregation: &str) -> RawArguments {
    RawArguments {
        source_system_id: Some("1".into()),
        element_id: Some("2".into()),
        parameter_id: Some(parameter_id.to_string()),
        sub_index: sub_index.map(str::to_string),
        window_start: Some("2024-01-01T00:00:00Z".into()),
        window_end: Some("2024-01-02T00:00:00Z".into()),
        aggregation_kind: Some(aggregation.into()),
    }
}

pub async fn temp_repo() -> (TempDir, HistoryRepo) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trend.db");
    let repo = HistoryRepo::connect(path.to_str().unwrap(), 2, 5).await.unwrap();
    repo.init().await.unwrap();
    (dir, repo)
}

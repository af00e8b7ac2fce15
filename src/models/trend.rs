// Histogram trend request/response and the statistics bundle

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AggregationKind, ElementRef};

/// Precomputed summary of a parameter's trend over a window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendStatistics {
    pub minimum: f64,
    pub maximum: f64,
    pub average: f64,
    pub mean_deviation: f64,
    pub standard_deviation: f64,
}

impl TrendStatistics {
    /// The field matching `kind`.
    pub fn select(&self, kind: AggregationKind) -> f64 {
        match kind {
            AggregationKind::Minimum => self.minimum,
            AggregationKind::Average => self.average,
            AggregationKind::Maximum => self.maximum,
            AggregationKind::MeanDeviation => self.mean_deviation,
            AggregationKind::StandardDeviation => self.standard_deviation,
        }
    }
}

/// A parameter, optionally narrowed to one table row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterIndexPair {
    pub parameter_id: i32,
    pub index: Option<String>,
}

impl ParameterIndexPair {
    pub fn new(parameter_id: i32, index: Option<String>) -> Self {
        Self { parameter_id, index }
    }

    /// Key the backend uses in the statistics map: "{pid}/" or "{pid}/{index}".
    pub fn key(&self) -> String {
        format!("{}/{}", self.parameter_id, self.index.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramTrendRequest {
    pub element: ElementRef,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub parameters: Vec<ParameterIndexPair>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramTrendResponse {
    pub trend_statistics: Option<HashMap<String, TrendStatistics>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_for_standalone_has_trailing_slash() {
        assert_eq!(ParameterIndexPair::new(100, None).key(), "100/");
    }

    #[test]
    fn key_for_table_member_includes_index() {
        assert_eq!(ParameterIndexPair::new(100, Some("A1".into())).key(), "100/A1");
    }
}

// Domain models: arguments, protocol metadata, trend statistics, result table

mod arguments;
mod protocol;
mod table;
mod trend;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use arguments::{
    AggregationKind, ArgumentSpec, ArgumentType, QueryArguments, RawArguments, input_arguments,
    to_utc,
};
pub use protocol::{ParameterInfo, ProtocolDefinition};
pub use table::{
    AGGREGATION_COLUMN, Cell, CellValue, Column, ColumnType, INDEX_COLUMN, Page, QueryResult, Row,
};
pub use trend::{HistogramTrendRequest, HistogramTrendResponse, ParameterIndexPair, TrendStatistics};

/// Identity of a monitored element: source system (agent) id and element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRef {
    pub source_system_id: i32,
    pub element_id: i32,
}

impl ElementRef {
    pub fn new(source_system_id: i32, element_id: i32) -> Self {
        Self {
            source_system_id,
            element_id,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source_system_id, self.element_id)
    }
}

// Query arguments: raw host input, validated QueryArguments, aggregation kind, argument list

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConnectorError;

use super::ElementRef;

/// Which trend statistic a query returns. Closed set; parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationKind {
    Minimum,
    Average,
    Maximum,
    MeanDeviation,
    StandardDeviation,
}

impl AggregationKind {
    /// Choice list order presented to the host.
    pub const ALL: [AggregationKind; 5] = [
        AggregationKind::Minimum,
        AggregationKind::Average,
        AggregationKind::Maximum,
        AggregationKind::MeanDeviation,
        AggregationKind::StandardDeviation,
    ];

    /// Literal name shown in the choice list (e.g. "Mean deviation").
    pub fn label(self) -> &'static str {
        match self {
            AggregationKind::Minimum => "Minimum",
            AggregationKind::Average => "Average",
            AggregationKind::Maximum => "Maximum",
            AggregationKind::MeanDeviation => "Mean deviation",
            AggregationKind::StandardDeviation => "Standard deviation",
        }
    }

    fn compact_name(self) -> &'static str {
        match self {
            AggregationKind::MeanDeviation => "MeanDeviation",
            AggregationKind::StandardDeviation => "StandardDeviation",
            other => other.label(),
        }
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AggregationKind {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AggregationKind::ALL
            .into_iter()
            .find(|k| s.eq_ignore_ascii_case(k.label()) || s.eq_ignore_ascii_case(k.compact_name()))
            .ok_or_else(|| ConnectorError::UnknownAggregation(s.to_string()))
    }
}

/// Arguments as the host hands them over: every value optional and untyped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArguments {
    #[serde(default, alias = "dmaId")]
    pub source_system_id: Option<String>,
    #[serde(default)]
    pub element_id: Option<String>,
    #[serde(default)]
    pub parameter_id: Option<String>,
    #[serde(default, alias = "index")]
    pub sub_index: Option<String>,
    #[serde(default, alias = "start")]
    pub window_start: Option<String>,
    #[serde(default, alias = "end")]
    pub window_end: Option<String>,
    #[serde(default, alias = "aggregation")]
    pub aggregation_kind: Option<String>,
}

/// Validated query input. Window bounds are already canonical UTC instants.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryArguments {
    pub source_system_id: i32,
    pub element_id: i32,
    pub parameter_id: i32,
    pub sub_index: Option<String>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub aggregation_kind: AggregationKind,
}

impl QueryArguments {
    pub fn from_raw(raw: &RawArguments) -> Result<Self, ConnectorError> {
        let source_system_id = parse_int(ARG_SOURCE_SYSTEM_ID, raw.source_system_id.as_deref())?;
        let element_id = parse_int(ARG_ELEMENT_ID, raw.element_id.as_deref())?;
        let parameter_id = parse_int(ARG_PARAMETER_ID, raw.parameter_id.as_deref())?;
        let sub_index = raw
            .sub_index
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);
        let window_start = parse_timestamp(ARG_WINDOW_START, raw.window_start.as_deref())?;
        let window_end = parse_timestamp(ARG_WINDOW_END, raw.window_end.as_deref())?;
        let aggregation_kind: AggregationKind =
            required(ARG_AGGREGATION_KIND, raw.aggregation_kind.as_deref())?.parse()?;

        if window_start > window_end {
            return Err(ConnectorError::InvertedWindow {
                start: window_start,
                end: window_end,
            });
        }

        Ok(Self {
            source_system_id,
            element_id,
            parameter_id,
            sub_index,
            window_start,
            window_end,
            aggregation_kind,
        })
    }

    pub fn element(&self) -> ElementRef {
        ElementRef {
            source_system_id: self.source_system_id,
            element_id: self.element_id,
        }
    }
}

pub const ARG_SOURCE_SYSTEM_ID: &str = "sourceSystemId";
pub const ARG_ELEMENT_ID: &str = "elementId";
pub const ARG_PARAMETER_ID: &str = "parameterId";
pub const ARG_SUB_INDEX: &str = "subIndex";
pub const ARG_WINDOW_START: &str = "windowStart";
pub const ARG_WINDOW_END: &str = "windowEnd";
pub const ARG_AGGREGATION_KIND: &str = "aggregationKind";

fn required<'a>(name: &'static str, value: Option<&'a str>) -> Result<&'a str, ConnectorError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConnectorError::MissingArgument(name)),
    }
}

fn parse_int(name: &'static str, value: Option<&str>) -> Result<i32, ConnectorError> {
    let v = required(name, value)?;
    v.parse().map_err(|e: std::num::ParseIntError| ConnectorError::InvalidArgument {
        name,
        value: v.to_string(),
        reason: e.to_string(),
    })
}

fn parse_timestamp(name: &'static str, value: Option<&str>) -> Result<DateTime<Utc>, ConnectorError> {
    let v = required(name, value)?;
    to_utc(v).ok_or_else(|| ConnectorError::InvalidArgument {
        name,
        value: v.to_string(),
        reason: "expected RFC 3339, local date-time or epoch milliseconds".into(),
    })
}

/// Converts a timestamp literal to UTC. Offsets are honoured; naive values are local time.
pub fn to_utc(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .and_then(|naive| local_to_utc(naive, |n| Local.offset_from_local_datetime(n)))
}

/// Wall-clock time to UTC given the zone's offset lookup. Ambiguous times take the earlier
/// instant; times skipped by a forward transition use the offset in effect before it.
pub(crate) fn local_to_utc(
    naive: NaiveDateTime,
    offset_at: impl Fn(&NaiveDateTime) -> LocalResult<FixedOffset>,
) -> Option<DateTime<Utc>> {
    let offset = match offset_at(&naive) {
        LocalResult::Single(o) | LocalResult::Ambiguous(o, _) => o,
        LocalResult::None => offset_at(&(naive - TimeDelta::days(1))).earliest()?,
    };
    let utc = naive - TimeDelta::seconds(offset.local_minus_utc().into());
    Some(Utc.from_utc_datetime(&utc))
}

/// Value type of an input argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentType {
    Int,
    String,
    DateTime,
    Choice,
}

/// One entry of the ordered input-argument list exposed to the host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentSpec {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub type_: ArgumentType,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<&'static str>,
}

pub fn input_arguments() -> Vec<ArgumentSpec> {
    let arg = |key: &'static str, label: &'static str, type_: ArgumentType, required: bool| ArgumentSpec {
        key,
        label,
        type_,
        required,
        choices: Vec::new(),
    };
    vec![
        arg(ARG_SOURCE_SYSTEM_ID, "Source system ID", ArgumentType::Int, true),
        arg(ARG_ELEMENT_ID, "Element ID", ArgumentType::Int, true),
        arg(ARG_PARAMETER_ID, "Parameter ID", ArgumentType::Int, true),
        arg(ARG_SUB_INDEX, "Index", ArgumentType::String, false),
        arg(ARG_WINDOW_START, "Start", ArgumentType::DateTime, true),
        arg(ARG_WINDOW_END, "End", ArgumentType::DateTime, true),
        ArgumentSpec {
            choices: AggregationKind::ALL.iter().map(|k| k.label()).collect(),
            ..arg(ARG_AGGREGATION_KIND, "Aggregation", ArgumentType::Choice, true)
        },
    ]
}

// Argument validation tests: required values, integer/time parsing, aggregation literals

mod common;

use chrono::{FixedOffset, TimeZone, Utc};
use common::raw_args;
use trendagg::error::{ConnectorError, ErrorKind};
use trendagg::models::*;

#[test]
fn valid_arguments_parse() {
    let args = QueryArguments::from_raw(&raw_args(100, Some("A1"), "Maximum")).unwrap();
    assert_eq!(args.source_system_id, 1);
    assert_eq!(args.element_id, 2);
    assert_eq!(args.parameter_id, 100);
    assert_eq!(args.sub_index.as_deref(), Some("A1"));
    assert_eq!(args.window_start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(args.window_end, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
    assert_eq!(args.aggregation_kind, AggregationKind::Maximum);
    assert_eq!(args.element(), ElementRef::new(1, 2));
}

#[test]
fn each_required_argument_is_enforced() {
    let cases: [(&str, fn(&mut RawArguments)); 6] = [
        ("sourceSystemId", |r| r.source_system_id = None),
        ("elementId", |r| r.element_id = None),
        ("parameterId", |r| r.parameter_id = None),
        ("windowStart", |r| r.window_start = None),
        ("windowEnd", |r| r.window_end = None),
        ("aggregationKind", |r| r.aggregation_kind = None),
    ];
    for (name, clear) in cases {
        let mut raw = raw_args(100, None, "Average");
        clear(&mut raw);
        let err = QueryArguments::from_raw(&raw).unwrap_err();
        assert!(
            matches!(err, ConnectorError::MissingArgument(n) if n == name),
            "{name}: {err:?}"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

#[test]
fn blank_values_count_as_missing() {
    let mut raw = raw_args(100, None, "Average");
    raw.element_id = Some("   ".into());
    let err = QueryArguments::from_raw(&raw).unwrap_err();
    assert!(matches!(err, ConnectorError::MissingArgument("elementId")));
}

#[test]
fn sub_index_is_optional_and_blank_means_absent() {
    let args = QueryArguments::from_raw(&raw_args(100, None, "Average")).unwrap();
    assert_eq!(args.sub_index, None);
    let args = QueryArguments::from_raw(&raw_args(100, Some(""), "Average")).unwrap();
    assert_eq!(args.sub_index, None);
}

#[test]
fn non_integer_id_is_invalid() {
    let mut raw = raw_args(100, None, "Average");
    raw.parameter_id = Some("abc".into());
    let err = QueryArguments::from_raw(&raw).unwrap_err();
    assert!(matches!(
        err,
        ConnectorError::InvalidArgument { name: "parameterId", .. }
    ));
    assert!(err.to_string().contains("abc"));
}

#[test]
fn unparseable_timestamp_is_invalid() {
    let mut raw = raw_args(100, None, "Average");
    raw.window_end = Some("tomorrow".into());
    let err = QueryArguments::from_raw(&raw).unwrap_err();
    assert!(matches!(
        err,
        ConnectorError::InvalidArgument { name: "windowEnd", .. }
    ));
}

#[test]
fn aggregation_matching_is_case_insensitive() {
    for literal in ["average", "Average", "AVERAGE"] {
        let args = QueryArguments::from_raw(&raw_args(100, None, literal)).unwrap();
        assert_eq!(args.aggregation_kind, AggregationKind::Average);
    }
    for literal in ["Mean deviation", "MEAN DEVIATION", "meandeviation"] {
        let args = QueryArguments::from_raw(&raw_args(100, None, literal)).unwrap();
        assert_eq!(args.aggregation_kind, AggregationKind::MeanDeviation);
    }
}

#[test]
fn unknown_aggregation_is_rejected() {
    let err = QueryArguments::from_raw(&raw_args(100, None, "Median")).unwrap_err();
    assert!(matches!(err, ConnectorError::UnknownAggregation(ref s) if s == "Median"));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "Could not find aggregation 'Median'.");
}

#[test]
fn non_utc_window_is_converted_and_round_trips() {
    let mut raw = raw_args(100, None, "Average");
    raw.window_start = Some("2024-01-01T01:00:00+01:00".into());
    raw.window_end = Some("2023-12-31T19:00:00-05:00".into());
    let args = QueryArguments::from_raw(&raw).unwrap();
    let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(args.window_start, midnight);
    assert_eq!(args.window_end, midnight);

    let plus_one = FixedOffset::east_opt(3600).unwrap();
    let back = args.window_start.with_timezone(&plus_one);
    assert_eq!(back, plus_one.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap());
    assert_eq!(back.with_timezone(&Utc), args.window_start);
}

#[test]
fn inverted_window_is_rejected() {
    let mut raw = raw_args(100, None, "Average");
    raw.window_start = Some("2024-01-03T00:00:00Z".into());
    let err = QueryArguments::from_raw(&raw).unwrap_err();
    assert!(matches!(err, ConnectorError::InvertedWindow { .. }));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn argument_list_is_ordered_with_closed_choices() {
    let specs = input_arguments();
    let keys: Vec<&str> = specs.iter().map(|s| s.key).collect();
    assert_eq!(
        keys,
        [
            "sourceSystemId",
            "elementId",
            "parameterId",
            "subIndex",
            "windowStart",
            "windowEnd",
            "aggregationKind"
        ]
    );
    assert!(!specs[3].required);
    assert!(specs.iter().filter(|s| s.key != "subIndex").all(|s| s.required));
    assert_eq!(
        specs[6].choices,
        ["Minimum", "Average", "Maximum", "Mean deviation", "Standard deviation"]
    );
}

#[test]
fn legacy_argument_names_deserialize() {
    let raw: RawArguments = serde_json::from_value(serde_json::json!({
        "dmaId": "1",
        "elementId": "2",
        "parameterId": "100",
        "index": "A1",
        "start": "2024-01-01T00:00:00Z",
        "end": "2024-01-02T00:00:00Z",
        "aggregation": "Minimum"
    }))
    .unwrap();
    let args = QueryArguments::from_raw(&raw).unwrap();
    assert_eq!(args.source_system_id, 1);
    assert_eq!(args.sub_index.as_deref(), Some("A1"));
    assert_eq!(args.aggregation_kind, AggregationKind::Minimum);
}

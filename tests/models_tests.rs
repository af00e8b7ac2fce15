// Model serialization tests (JSON camelCase, untagged cell values)

use trendagg::models::*;

#[test]
fn test_trend_statistics_serialization_camel_case() {
    let stats = TrendStatistics {
        minimum: 1.0,
        maximum: 9.0,
        average: 5.0,
        mean_deviation: 2.0,
        standard_deviation: 3.0,
    };
    let json = serde_json::to_string(&stats).unwrap();
    assert!(json.contains("\"meanDeviation\""));
    assert!(json.contains("\"standardDeviation\""));
    let back: TrendStatistics = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stats);
}

#[test]
fn test_parameter_info_defaults_optional_fields() {
    let p: ParameterInfo = serde_json::from_str(r#"{"id":100,"name":"Temperature"}"#).unwrap();
    assert_eq!(p, ParameterInfo::standalone(100, "Temperature"));
}

#[test]
fn test_cell_value_is_untagged() {
    let cell = Cell {
        value: CellValue::String("A1".into()),
        display_value: None,
    };
    assert_eq!(serde_json::to_string(&cell).unwrap(), r#"{"value":"A1"}"#);

    let cell = Cell {
        value: CellValue::Double(2.5),
        display_value: Some("2.5 dB".into()),
    };
    assert_eq!(
        serde_json::to_string(&cell).unwrap(),
        r#"{"value":2.5,"displayValue":"2.5 dB"}"#
    );
}

#[test]
fn test_column_serialization() {
    let json = serde_json::to_value(vec![INDEX_COLUMN, AGGREGATION_COLUMN]).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"name": "Index", "type": "string"},
            {"name": "Aggregation", "type": "double"}
        ])
    );
}

#[test]
fn test_element_ref_display() {
    assert_eq!(ElementRef::new(1, 2).to_string(), "1/2");
}

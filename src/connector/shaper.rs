// Result shaping: schema and the single row, both driven by the same ShapeDecision

use crate::models::{AGGREGATION_COLUMN, Cell, CellValue, Column, INDEX_COLUMN, Page, Row};

use super::descriptor::{ParameterDescriptor, ShapeDecision};

pub fn columns(shape: &ShapeDecision) -> Vec<Column> {
    match shape {
        ShapeDecision::Standalone => vec![AGGREGATION_COLUMN],
        ShapeDecision::TableMember { .. } => vec![INDEX_COLUMN, AGGREGATION_COLUMN],
    }
}

/// One row, never a next page. Table members only ever get the requested index.
pub fn build_page(descriptor: &ParameterDescriptor, value: f64) -> Page {
    let aggregation = Cell {
        value: CellValue::Double(value),
        display_value: Some(descriptor.display_value(value)),
    };
    let cells = match &descriptor.shape {
        ShapeDecision::Standalone => vec![aggregation],
        ShapeDecision::TableMember { index, .. } => vec![
            Cell {
                value: CellValue::String(index.clone()),
                display_value: None,
            },
            aggregation,
        ],
    };
    Page {
        rows: vec![Row { cells }],
        has_next_page: false,
    }
}

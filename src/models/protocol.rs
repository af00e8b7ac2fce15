// Element protocol metadata: parameter definitions and display formatting

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub id: i32,
    pub name: String,
    /// Id of the table this parameter is a column of; None for standalone parameters.
    #[serde(default)]
    pub parent_table: Option<i32>,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub units: String,
}

impl ParameterInfo {
    pub fn standalone(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_table: None,
            decimals: None,
            units: String::new(),
        }
    }

    pub fn column(id: i32, name: impl Into<String>, table_id: i32) -> Self {
        Self {
            parent_table: Some(table_id),
            ..Self::standalone(id, name)
        }
    }

    pub fn with_format(mut self, decimals: Option<u8>, units: impl Into<String>) -> Self {
        self.decimals = decimals;
        self.units = units.into();
        self
    }

    /// Renders a value the way the element presents it, e.g. "12.50 dBm".
    pub fn display_value(&self, value: f64) -> String {
        let number = match self.decimals {
            Some(d) => format!("{:.*}", d as usize, value),
            None => value.to_string(),
        };
        if self.units.is_empty() {
            number
        } else {
            format!("{} {}", number, self.units)
        }
    }
}

/// Protocol definition of one element, as returned by the backend metadata lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolDefinition {
    pub name: String,
    pub version: String,
    pub parameters: Vec<ParameterInfo>,
}

impl ProtocolDefinition {
    pub fn find_parameter(&self, parameter_id: i32) -> Option<&ParameterInfo> {
        self.parameters.iter().find(|p| p.id == parameter_id)
    }
}

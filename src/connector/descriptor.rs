// Parameter descriptor: resolved once per session from the element's protocol

use tracing::{debug, instrument};

use crate::backend::TrendBackend;
use crate::error::ConnectorError;
use crate::models::{ParameterInfo, QueryArguments};

/// Output shape of a session. Drives both the column schema and the row layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeDecision {
    Standalone,
    TableMember { table_id: i32, index: String },
}

impl ShapeDecision {
    pub fn is_table_member(&self) -> bool {
        matches!(self, ShapeDecision::TableMember { .. })
    }

    /// Row index sent to the backend; None for standalone parameters.
    pub fn index(&self) -> Option<&str> {
        match self {
            ShapeDecision::Standalone => None,
            ShapeDecision::TableMember { index, .. } => Some(index.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub parameter: ParameterInfo,
    pub shape: ShapeDecision,
}

impl ParameterDescriptor {
    pub fn id(&self) -> i32 {
        self.parameter.id
    }

    pub fn display_value(&self, value: f64) -> String {
        self.parameter.display_value(value)
    }

    /// Picks the shape from the parameter's table linkage and the requested index.
    pub fn from_parameter(
        parameter: ParameterInfo,
        sub_index: Option<&str>,
    ) -> Result<Self, ConnectorError> {
        let shape = match (parameter.parent_table, sub_index) {
            (None, index) => {
                if let Some(index) = index {
                    debug!(parameter_id = parameter.id, index, "index ignored for standalone parameter");
                }
                ShapeDecision::Standalone
            }
            (Some(table_id), Some(index)) => ShapeDecision::TableMember {
                table_id,
                index: index.to_string(),
            },
            (Some(table_id), None) => {
                return Err(ConnectorError::MissingIndex {
                    parameter_id: parameter.id,
                    table_id,
                });
            }
        };
        Ok(Self { parameter, shape })
    }
}

#[instrument(skip(backend, args), fields(element = %args.element(), parameter_id = args.parameter_id))]
pub async fn resolve<B: TrendBackend>(
    backend: &B,
    args: &QueryArguments,
) -> Result<ParameterDescriptor, ConnectorError> {
    let element = args.element();
    let protocol = backend
        .element_protocol(element)
        .await?
        .ok_or(ConnectorError::ProtocolNotFound(element))?;

    let parameter = protocol
        .find_parameter(args.parameter_id)
        .cloned()
        .ok_or(ConnectorError::ParameterNotFound(args.parameter_id))?;

    let descriptor = ParameterDescriptor::from_parameter(parameter, args.sub_index.as_deref())?;
    debug!(
        protocol = %protocol.name,
        table_member = descriptor.shape.is_table_member(),
        "parameter resolved"
    );
    Ok(descriptor)
}

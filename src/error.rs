// Typed errors for the connector and its backends

use chrono::{DateTime, Utc};

use crate::models::ElementRef;

/// Failure of a backend call (transport, storage, decoding).
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("corrupt protocol blob for element {element}: {message}")]
    CorruptBlob { element: ElementRef, message: String },
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Coarse classification of a [`ConnectorError`], used by hosts to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Resolution,
    Fetch,
    Backend,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Resolution => "resolution",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Backend => "backend",
        }
    }
}

/// Terminal failure of one query execution.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("Malformed query string: {0}")]
    MalformedQuery(String),
    #[error("Missing required argument '{0}'.")]
    MissingArgument(&'static str),
    #[error("Invalid value '{value}' for argument '{name}': {reason}.")]
    InvalidArgument {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("Could not find aggregation '{0}'.")]
    UnknownAggregation(String),
    #[error("Window start {start} is after window end {end}.")]
    InvertedWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Parameter '{parameter_id}' belongs to table '{table_id}' and requires an index.")]
    MissingIndex { parameter_id: i32, table_id: i32 },
    #[error("Protocol not found for element '{0}'.")]
    ProtocolNotFound(ElementRef),
    #[error("Parameter not found '{0}'.")]
    ParameterNotFound(i32),
    #[error("Could not fetch trend history for parameter '{identity}'.")]
    TrendFetch {
        identity: String,
        #[source]
        source: Option<BackendError>,
    },
    #[error("Backend request failed: {0}")]
    Backend(#[from] BackendError),
}

impl ConnectorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConnectorError::MalformedQuery(_)
            | ConnectorError::MissingArgument(_)
            | ConnectorError::InvalidArgument { .. }
            | ConnectorError::UnknownAggregation(_)
            | ConnectorError::InvertedWindow { .. }
            | ConnectorError::MissingIndex { .. } => ErrorKind::Validation,
            ConnectorError::ProtocolNotFound(_) | ConnectorError::ParameterNotFound(_) => {
                ErrorKind::Resolution
            }
            ConnectorError::TrendFetch { .. } => ErrorKind::Fetch,
            ConnectorError::Backend(_) => ErrorKind::Backend,
        }
    }
}

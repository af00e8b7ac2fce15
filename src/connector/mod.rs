// Trend aggregation connector: validate → resolve → fetch → select → shape

mod descriptor;
mod fetcher;
mod shaper;

use tracing::{info, instrument};

use crate::backend::TrendBackend;
use crate::error::ConnectorError;
use crate::models::{ArgumentSpec, Column, Page, QueryArguments, QueryResult, RawArguments};

pub use descriptor::{ParameterDescriptor, ShapeDecision, resolve};
pub use fetcher::{build_request, fetch_trend_statistics};
pub use shaper::{build_page, columns};

/// Name under which the connector registers with a host.
pub const NAME: &str = "Get parameter trend aggregation";

/// Ordered input arguments, for hosts that render an argument form.
pub fn input_arguments() -> Vec<ArgumentSpec> {
    crate::models::input_arguments()
}

/// One query session: validated arguments plus the descriptor resolved when it opened.
#[derive(Debug, Clone)]
pub struct QuerySession {
    arguments: QueryArguments,
    descriptor: ParameterDescriptor,
}

impl QuerySession {
    /// Validates `raw` and resolves the parameter descriptor (one metadata round trip).
    pub async fn open<B: TrendBackend>(
        backend: &B,
        raw: &RawArguments,
    ) -> Result<Self, ConnectorError> {
        let arguments = QueryArguments::from_raw(raw)?;
        Self::with_arguments(backend, arguments).await
    }

    pub async fn with_arguments<B: TrendBackend>(
        backend: &B,
        arguments: QueryArguments,
    ) -> Result<Self, ConnectorError> {
        let descriptor = resolve(backend, &arguments).await?;
        Ok(Self {
            arguments,
            descriptor,
        })
    }

    pub fn arguments(&self) -> &QueryArguments {
        &self.arguments
    }

    pub fn descriptor(&self) -> &ParameterDescriptor {
        &self.descriptor
    }

    pub fn columns(&self) -> Vec<Column> {
        columns(&self.descriptor.shape)
    }

    /// Fetches the statistics and returns the (only) page.
    #[instrument(skip(self, backend), fields(parameter_id = self.descriptor.id(), aggregation = %self.arguments.aggregation_kind))]
    pub async fn next_page<B: TrendBackend>(&self, backend: &B) -> Result<Page, ConnectorError> {
        let statistics =
            fetch_trend_statistics(backend, &self.arguments, &self.descriptor.shape).await?;
        let value = statistics.select(self.arguments.aggregation_kind);
        info!(value, "trend aggregation computed");
        Ok(build_page(&self.descriptor, value))
    }
}

/// Opens a session and runs it once. What a host does for a single query.
pub async fn execute<B: TrendBackend>(
    backend: &B,
    raw: &RawArguments,
) -> Result<QueryResult, ConnectorError> {
    let session = QuerySession::open(backend, raw).await?;
    let page = session.next_page(backend).await?;
    Ok(QueryResult {
        columns: session.columns(),
        page,
    })
}

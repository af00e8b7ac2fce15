// Backend seam: the two calls the connector consumes from the monitoring backend

mod memory;

use std::future::Future;

use crate::error::BackendError;
use crate::models::{ElementRef, HistogramTrendRequest, HistogramTrendResponse, ProtocolDefinition};

pub use memory::MemoryBackend;

/// Monitoring backend as seen by the connector.
///
/// Both calls are a single round trip. `Ok(None)` from [`TrendBackend::element_protocol`]
/// means the backend has no definition for that element; transport problems are `Err`.
pub trait TrendBackend: Send + Sync {
    fn element_protocol(
        &self,
        element: ElementRef,
    ) -> impl Future<Output = Result<Option<ProtocolDefinition>, BackendError>> + Send;

    fn histogram_trend(
        &self,
        request: &HistogramTrendRequest,
    ) -> impl Future<Output = Result<HistogramTrendResponse, BackendError>> + Send;
}

impl<B: TrendBackend> TrendBackend for std::sync::Arc<B> {
    fn element_protocol(
        &self,
        element: ElementRef,
    ) -> impl Future<Output = Result<Option<ProtocolDefinition>, BackendError>> + Send {
        self.as_ref().element_protocol(element)
    }

    fn histogram_trend(
        &self,
        request: &HistogramTrendRequest,
    ) -> impl Future<Output = Result<HistogramTrendResponse, BackendError>> + Send {
        self.as_ref().histogram_trend(request)
    }
}

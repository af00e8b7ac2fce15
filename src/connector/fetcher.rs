// Trend statistics fetch: one histogram request for exactly one parameter/index pair

use tracing::{debug, instrument};

use crate::backend::TrendBackend;
use crate::error::ConnectorError;
use crate::models::{HistogramTrendRequest, ParameterIndexPair, QueryArguments, TrendStatistics};

use super::descriptor::ShapeDecision;

/// Builds the request for the session's window and pair. Bounds are already UTC.
pub fn build_request(args: &QueryArguments, shape: &ShapeDecision) -> HistogramTrendRequest {
    HistogramTrendRequest {
        element: args.element(),
        start_time: args.window_start,
        end_time: args.window_end,
        parameters: vec![ParameterIndexPair::new(
            args.parameter_id,
            shape.index().map(str::to_string),
        )],
    }
}

#[instrument(skip(backend, args, shape), fields(element = %args.element(), parameter_id = args.parameter_id))]
pub async fn fetch_trend_statistics<B: TrendBackend>(
    backend: &B,
    args: &QueryArguments,
    shape: &ShapeDecision,
) -> Result<TrendStatistics, ConnectorError> {
    let request = build_request(args, shape);
    let pair = &request.parameters[0];
    let key = pair.key();
    let identity = match &pair.index {
        Some(index) => format!("{}/{}/{}", request.element, pair.parameter_id, index),
        None => format!("{}/{}", request.element, pair.parameter_id),
    };

    let response = match backend.histogram_trend(&request).await {
        Ok(r) => r,
        Err(e) => {
            return Err(ConnectorError::TrendFetch {
                identity,
                source: Some(e),
            });
        }
    };

    let Some(statistics) = response
        .trend_statistics
        .as_ref()
        .and_then(|map| map.get(&key))
        .copied()
    else {
        debug!(
            key = %key,
            has_map = response.trend_statistics.is_some(),
            "trend statistics missing"
        );
        return Err(ConnectorError::TrendFetch {
            identity,
            source: None,
        });
    };

    Ok(statistics)
}

// Handlers: version, argument list, trend aggregation query, history ingestion

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::connector;
use crate::error::{ConnectorError, ErrorKind};
use crate::history_repo::TrendSample;
use crate::models::{ElementRef, ProtocolDefinition, RawArguments};
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/arguments — connector name and its ordered input arguments.
pub(super) async fn arguments_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": connector::NAME,
        "arguments": connector::input_arguments(),
    }))
}

/// GET /api/trend-aggregation — runs one query; arguments come from the query string.
pub(super) async fn trend_aggregation_handler(
    State(state): State<AppState>,
    query: Result<Query<RawArguments>, QueryRejection>,
) -> Response {
    let Query(raw) = match query {
        Ok(q) => q,
        Err(rejection) => {
            return error_response(ConnectorError::MalformedQuery(rejection.body_text()));
        }
    };
    match connector::execute(&state.history_repo, &raw).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/elements/{sourceSystemId}/{elementId}/protocol — stores (or replaces) the element's protocol.
pub(super) async fn save_protocol_handler(
    State(state): State<AppState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
    body: Result<Json<ProtocolDefinition>, JsonRejection>,
) -> Response {
    let element = match path {
        Ok(Path((source_system_id, element_id))) => ElementRef::new(source_system_id, element_id),
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let Json(protocol) = match body {
        Ok(b) => b,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    match state.history_repo.save_protocol(element, &protocol).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_failed(e),
    }
}

/// POST /api/elements/{sourceSystemId}/{elementId}/samples — appends trend samples for the element.
pub(super) async fn save_samples_handler(
    State(state): State<AppState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
    body: Result<Json<Vec<TrendSample>>, JsonRejection>,
) -> Response {
    let element = match path {
        Ok(Path((source_system_id, element_id))) => ElementRef::new(source_system_id, element_id),
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let Json(samples) = match body {
        Ok(b) => b,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    match state.history_repo.save_samples(element, &samples).await {
        Ok(()) => Json(serde_json::json!({ "saved": samples.len() })).into_response(),
        Err(e) => store_failed(e),
    }
}

fn error_response(e: ConnectorError) -> Response {
    let kind = e.kind();
    let status = match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Resolution => StatusCode::NOT_FOUND,
        ErrorKind::Fetch | ErrorKind::Backend => StatusCode::BAD_GATEWAY,
    };
    if status.is_server_error() {
        tracing::warn!(error = %e, kind = kind.as_str(), "trend aggregation failed");
    } else {
        tracing::debug!(error = %e, kind = kind.as_str(), "trend aggregation rejected");
    }
    error_body(status, kind, e.to_string())
}

fn bad_request(message: String) -> Response {
    tracing::debug!(error = %message, "ingestion rejected");
    error_body(StatusCode::BAD_REQUEST, ErrorKind::Validation, message)
}

fn store_failed(e: anyhow::Error) -> Response {
    tracing::warn!(error = %e, "ingestion failed");
    error_body(StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Backend, e.to_string())
}

fn error_body(status: StatusCode, kind: ErrorKind, message: String) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": message,
            "kind": kind.as_str(),
        })),
    )
        .into_response()
}

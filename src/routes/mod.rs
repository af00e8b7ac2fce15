// HTTP routes

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::history_repo::HistoryRepo;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) history_repo: Arc<HistoryRepo>,
}

pub fn app(history_repo: Arc<HistoryRepo>) -> Router {
    let state = AppState { history_repo };
    Router::new()
        .route("/", get(|| async { crate::version::DESCRIPTION })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/arguments", get(http::arguments_handler)) // GET /api/arguments
        .route("/api/trend-aggregation", get(http::trend_aggregation_handler)) // GET /api/trend-aggregation
        .route(
            "/api/elements/{source_system_id}/{element_id}/protocol",
            post(http::save_protocol_handler),
        ) // POST /api/elements/{sourceSystemId}/{elementId}/protocol
        .route(
            "/api/elements/{source_system_id}/{element_id}/samples",
            post(http::save_samples_handler),
        ) // POST /api/elements/{sourceSystemId}/{elementId}/samples
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

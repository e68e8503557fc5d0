use std::sync::Arc;

use axum::{
    routing::{get, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::file::record_service::RecordService;

pub mod records;

/// Shared handler state: one record service per collection, both backed by
/// the same document store.
#[derive(Clone)]
pub struct ServerState {
    pub scenarios: Arc<RecordService>,
    pub vehicles: Arc<RecordService>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health, both record collections,
/// CORS and request tracing.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let collections = Router::new()
        .route(
            "/scenarios",
            get(records::list_scenarios).post(records::create_scenario),
        )
        .route(
            "/scenarios/:id",
            put(records::update_scenario).delete(records::delete_scenario),
        )
        .route(
            "/vehicles",
            get(records::list_vehicles).post(records::create_vehicle),
        )
        .route(
            "/vehicles/:id",
            put(records::update_vehicle).delete(records::delete_vehicle),
        );

    Router::new()
        .route("/health", get(health))
        .merge(collections)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

use std::sync::Arc;

use axum::http::{header, HeaderName, Method};
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::collection;
use crate::shared::data::store::MemoryStore;
use crate::shared::request_log::request_logger;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
}

impl AppState {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// CRUD routes of every collection plus `/health`.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            HeaderName::from_static("idempotency-key"),
        ]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(
            "/api/:collection",
            get(collection::list).post(collection::create),
        )
        .route("/api/:collection/reorder", post(collection::reorder))
        .route(
            "/api/:collection/:id",
            put(collection::update).delete(collection::delete),
        )
        .with_state(state)
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
}

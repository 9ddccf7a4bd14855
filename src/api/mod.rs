pub mod health;
pub mod merchants;

use crate::config::Config;
use crate::db::Repository;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config) -> Self {
        Self { repo, config }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/api/v1/merchants/most_revenue",
            get(merchants::get_most_revenue),
        )
        .route(
            "/api/v1/merchants/:id/revenue",
            get(merchants::get_merchant_revenue),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

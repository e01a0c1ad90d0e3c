//! roracle-ui library interface
//!
//! Exposes the API client, the view controllers and the JSON router so the
//! binary and the integration tests share them.

pub mod api;
pub mod client;
pub mod error;
pub mod views;

pub use crate::client::{RorApi, RoracleClient};
pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// RORacle API client
    pub api: Arc<dyn RorApi>,
    /// Affiliation lookups in flight per results request
    pub lookup_concurrency: usize,
}

impl AppState {
    pub fn new(api: Arc<dyn RorApi>, lookup_concurrency: usize) -> Self {
        Self {
            api,
            lookup_concurrency: lookup_concurrency.max(1),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::results_routes())
        .merge(api::tests_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

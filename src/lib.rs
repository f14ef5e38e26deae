// =============================================================================
// Parque Backend - Library Root
// =============================================================================
// Table of Contents:
// 1. Modules
// 2. Application State
// 3. Router Setup
// =============================================================================

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod nearby;
pub mod parks;
pub mod seed;
pub mod store;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::store::ParkStore;

// -----------------------------------------------------------------------------
// 2. Application State
// -----------------------------------------------------------------------------

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ParkStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ParkStore>) -> Self {
        Self { store }
    }
}

// -----------------------------------------------------------------------------
// 3. Router Setup
// -----------------------------------------------------------------------------

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Visitor API
        .route("/parks/:park_id/nearby", get(parks::get_nearby))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

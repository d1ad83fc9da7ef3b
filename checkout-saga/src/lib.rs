//! Checkout saga orchestrator library: the HTTP surface, the saga engine,
//! and the downstream client adapters, factored out of `main.rs` so the
//! router can be exercised directly in integration tests.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clients;
pub mod config;
pub mod errors;
pub mod event_bus;
pub mod handlers;
pub mod models;
pub mod money;
pub mod principal;
pub mod saga;

use axum::routing::{get, post};
use axum::Router;

/// Assemble the full `/api/v1/checkout/*` + `/health` router over the
/// given application state, with the same middleware stack the production
/// binary runs (spec §10.1).
#[must_use]
pub fn router(state: handlers::AppState) -> Router {
    use saga_web::middleware::correlation_id_layer;
    use tower_http::compression::CompressionLayer;
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/health", get(saga_web::handlers::health_check))
        .route("/api/v1/checkout/initiate", post(handlers::initiate))
        .route("/api/v1/checkout/complete", post(handlers::complete))
        .route("/api/v1/checkout/cancel", post(handlers::cancel))
        .route("/api/v1/checkout/address/validate", post(handlers::validate_address_handler))
        .route("/api/v1/checkout/shipping/calculate", post(handlers::calculate_shipping_handler))
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .with_state(state)
}

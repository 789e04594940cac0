//! Acumen Watches storefront library.
//!
//! Catalog store, cart engine, view renderers and the filename router, plus
//! the axum shell that serves them. The binary in `main.rs` only wires
//! configuration, telemetry and the listener around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod render;
pub mod router;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, header},
    middleware::from_fn,
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;

/// Cache policy for `/assets`.
const ASSET_CACHE_CONTROL: &str = "public, max-age=3600";

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let assets = ServeDir::new(state.config().static_dir.join("assets"));

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service(
            "/assets",
            tower::ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static(ASSET_CACHE_CONTROL),
                ))
                .service(assets),
        )
        .with_state(state)
        .layer(from_fn(middleware::request_id_middleware))
        .layer(middleware::trace_layer())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /{file}                 - Page by file name (collection.html, product.html?id=...);
//!                                unknown names fall through to the static directory
//! GET  /assets/*               - Static assets
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! POST /cart/add               - Add to cart (returns badge, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//! GET  /cart/preview           - Mini cart (fragment)
//! GET  /cart/events            - WebSocket: cart summary after every change
//! ```

pub mod cart;
pub mod events;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
        .route("/preview", get(cart::preview))
        .route("/events", get(events::events))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::page))
        .nest("/cart", cart_routes())
        .route("/{file}", get(pages::page))
}

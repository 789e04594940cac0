//! Cart route handlers.
//!
//! Cart controls post forms; with HTMX the response is the fragment to swap
//! in, and an `HX-Trigger: cart-updated` header when the cart changed. Plain
//! form posts (no `HX-Request` header) are redirected to the cart page.

use acumen_core::ProductId;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::render::{self, CartView, cart::CartItemsTemplate};
use crate::state::AppState;

/// HTMX event fired on the body after a cart change.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Add an item to the cart.
///
/// # Errors
///
/// Returns 404 for an unknown product, 409 for a currency mismatch and 400
/// for a malformed form.
#[instrument(skip(state, headers))]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product_id = parse_product_id(&form.product_id)?;
    let quantity = parse_quantity(form.quantity.as_deref())?.unwrap_or(1);

    let badge = {
        let mut engine = state.cart().await;
        engine.add(&product_id, quantity)?;
        render::cart_badge(engine.cart())
    };

    add_breadcrumb("cart", "Added to cart", &[("product_id", product_id.as_str())]);
    Ok(respond(&headers, true, badge))
}

/// Update a line's quantity. Zero removes the line.
///
/// # Errors
///
/// Returns 400 if the product id or quantity is missing or malformed.
#[instrument(skip(state, headers))]
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let product_id = parse_product_id(&form.product_id)?;
    let quantity = parse_quantity(form.quantity.as_deref())?
        .ok_or_else(|| AppError::BadRequest("quantity is required".to_string()))?;

    let (changed, items) = {
        let mut engine = state.cart().await;
        let changed = engine.update(&product_id, quantity);
        (changed, cart_items(&state, engine.cart()))
    };

    Ok(respond(&headers, changed, items))
}

/// Remove a line.
///
/// # Errors
///
/// Returns 400 if the product id is missing.
#[instrument(skip(state, headers))]
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let product_id = parse_product_id(&form.product_id)?;

    let (changed, items) = {
        let mut engine = state.cart().await;
        let changed = engine.remove(&product_id);
        (changed, cart_items(&state, engine.cart()))
    };

    if changed {
        add_breadcrumb("cart", "Removed from cart", &[("product_id", product_id.as_str())]);
    }
    Ok(respond(&headers, changed, items))
}

/// Empty the cart.
#[instrument(skip(state, headers))]
pub async fn clear(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (changed, items) = {
        let mut engine = state.cart().await;
        let changed = engine.clear();
        (changed, cart_items(&state, engine.cart()))
    };

    respond(&headers, changed, items)
}

/// Get the cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    render::cart_badge(state.cart().await.cart())
}

/// Get the mini cart.
#[instrument(skip(state))]
pub async fn preview(State(state): State<AppState>) -> impl IntoResponse {
    render::cart_preview(state.catalog(), state.cart().await.cart())
}

// =============================================================================
// Helpers
// =============================================================================

fn cart_items(state: &AppState, cart: &acumen_core::Cart) -> CartItemsTemplate {
    CartItemsTemplate {
        cart: CartView::new(state.catalog(), cart),
    }
}

/// Fragment for HTMX callers, redirect for plain form posts.
fn respond(headers: &HeaderMap, changed: bool, fragment: impl IntoResponse) -> Response {
    if !is_htmx(headers) {
        return Redirect::to("/cart.html").into_response();
    }
    if changed {
        (AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]), fragment).into_response()
    } else {
        fragment.into_response()
    }
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("product_id is required".to_string()));
    }
    Ok(ProductId::from(trimmed))
}

/// Parse an optional quantity field; blank counts as absent.
fn parse_quantity(raw: Option<&str>) -> Result<Option<i64>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("invalid quantity: {value}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{HeaderValue, StatusCode};

    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(None).unwrap(), None);
        assert_eq!(parse_quantity(Some("  ")).unwrap(), None);
        assert_eq!(parse_quantity(Some("3")).unwrap(), Some(3));
        assert_eq!(parse_quantity(Some("-2")).unwrap(), Some(-2));
        assert!(matches!(
            parse_quantity(Some("two")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_product_id() {
        assert_eq!(parse_product_id(" axion01 ").unwrap().as_str(), "axion01");
        assert!(matches!(parse_product_id(""), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_plain_post_redirects() {
        let response = respond(&HeaderMap::new(), true, "ignored");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[test]
    fn test_trigger_only_on_change() {
        let mut headers = HeaderMap::new();
        headers.insert("HX-Request", HeaderValue::from_static("true"));

        let changed = respond(&headers, true, "ok");
        assert_eq!(
            changed.headers().get("HX-Trigger").unwrap(),
            CART_UPDATED_EVENT
        );

        let unchanged = respond(&headers, false, "ok");
        assert!(unchanged.headers().get("HX-Trigger").is_none());
    }
}

//! Cart views: full page, header badge and dropdown preview.
//!
//! Lines render from their snapshots, so a cart stays displayable after a
//! product leaves the catalog. Such lines are marked unavailable.

use acumen_core::{Cart, CartLine, ProductId};
use askama::Template;
use askama_web::WebTemplate;

use super::{Fragment, Intent, LayoutView, RenderError, product_href};
use crate::catalog::Catalog;
use crate::filters;

/// Lines listed in the header preview before "and N more".
const PREVIEW_LINES: usize = 3;

/// One cart line for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub href: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    /// `false` when the product is no longer in the catalog.
    pub available: bool,
}

impl CartLineView {
    fn new(catalog: &Catalog, line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            name: line.name_snapshot.clone(),
            image: line.image_snapshot.clone(),
            href: product_href(&line.product_id),
            quantity: line.quantity,
            unit_price: line.price_snapshot.display(),
            line_total: line.line_total().display(),
            available: catalog.find_product_by_id(&line.product_id).is_some(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    /// "1 item" or "N items".
    pub item_label: String,
    pub subtotal: String,
    pub is_empty: bool,
}

impl CartView {
    #[must_use]
    pub fn new(catalog: &Catalog, cart: &Cart) -> Self {
        let item_count = cart.item_count();
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView::new(catalog, line))
                .collect(),
            item_count,
            item_label: if item_count == 1 {
                "1 item".to_string()
            } else {
                format!("{item_count} items")
            },
            subtotal: cart.subtotal().display(),
            is_empty: cart.is_empty(),
        }
    }
}

/// Full cart page.
#[derive(Template)]
#[template(path = "pages/cart.html")]
struct CartPageTemplate {
    title: String,
    layout: LayoutView,
    cart: CartView,
}

/// Cart lines and totals (swapped in after quantity changes).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Header cart count badge.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Header dropdown summarising the cart.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_preview.html")]
pub struct CartPreviewTemplate {
    pub cart: CartView,
    pub more: usize,
}

/// Render the full cart page.
///
/// Declares quantity and remove controls for every line, plus a clear
/// control when the cart has lines.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn cart_page(catalog: &Catalog, cart: &Cart) -> Result<Fragment, RenderError> {
    let mut intents: Vec<Intent> = cart
        .lines()
        .iter()
        .flat_map(|line| line_intents(&line.product_id))
        .collect();
    if !cart.is_empty() {
        intents.push(Intent::ClearCart);
    }

    let template = CartPageTemplate {
        title: "Your Cart".to_string(),
        layout: LayoutView::new(catalog, cart),
        cart: CartView::new(catalog, cart),
    };

    Ok(Fragment::found(template.title.clone(), template.render()?, intents))
}

/// Header badge for the current item count.
#[must_use]
pub fn cart_badge(cart: &Cart) -> CartCountTemplate {
    CartCountTemplate {
        count: cart.item_count(),
    }
}

/// Dropdown preview listing the first few lines.
#[must_use]
pub fn cart_preview(catalog: &Catalog, cart: &Cart) -> CartPreviewTemplate {
    let mut view = CartView::new(catalog, cart);
    let more = view.lines.len().saturating_sub(PREVIEW_LINES);
    view.lines.truncate(PREVIEW_LINES);
    CartPreviewTemplate { cart: view, more }
}

fn line_intents(product_id: &ProductId) -> [Intent; 2] {
    [
        Intent::UpdateQuantity {
            product_id: product_id.clone(),
        },
        Intent::RemoveLine {
            product_id: product_id.clone(),
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use acumen_core::Price;

    use super::*;

    fn line(catalog: &Catalog, id: &str, quantity: u32) -> CartLine {
        let product = catalog.find_product_by_id(&ProductId::new(id)).unwrap();
        CartLine {
            product_id: product.id.clone(),
            quantity,
            price_snapshot: product.price,
            name_snapshot: product.name.clone(),
            image_snapshot: product.primary_image().to_owned(),
        }
    }

    #[test]
    fn test_empty_cart_page() {
        let catalog = Catalog::builtin().unwrap();
        let fragment = cart_page(&catalog, &Cart::new()).unwrap();

        assert!(!fragment.is_not_found());
        assert!(fragment.intents.is_empty());
        assert!(fragment.html.contains("Your cart is empty"));
    }

    #[test]
    fn test_cart_page_lists_lines_and_subtotal() {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = Cart::new();
        cart.add(line(&catalog, "axion01", 2));
        cart.add(line(&catalog, "nova02", 1));

        let fragment = cart_page(&catalog, &cart).unwrap();

        assert!(fragment.html.contains("Axion Heritage Chronometer"));
        assert!(fragment.html.contains("$17,998.00"));
        assert!(fragment.html.contains("$25,497.00"));
        assert!(fragment.html.contains("3 items"));
        // Two per line plus clear.
        assert_eq!(fragment.intents.len(), 5);
        assert!(fragment.intents.contains(&Intent::ClearCart));
        assert!(fragment.intents.contains(&Intent::RemoveLine {
            product_id: ProductId::new("nova02")
        }));
    }

    #[test]
    fn test_line_for_retired_product_renders_from_snapshot() {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = Cart::new();
        cart.add(CartLine {
            product_id: ProductId::new("retired"),
            quantity: 1,
            price_snapshot: Price::new(rust_decimal::Decimal::from(100), Default::default()),
            name_snapshot: "Retired Diver".to_string(),
            image_snapshot: "/assets/images/products/retired.jpg".to_string(),
        });

        let view = CartView::new(&catalog, &cart);
        assert!(!view.lines[0].available);

        let fragment = cart_page(&catalog, &cart).unwrap();
        assert!(fragment.html.contains("Retired Diver"));
        assert!(fragment.html.contains("no longer available"));
    }

    #[test]
    fn test_badge_and_preview() {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = Cart::new();
        for id in ["axion01", "nova02", "zenith03", "imperial04"] {
            cart.add(line(&catalog, id, 1));
        }

        let badge = cart_badge(&cart).render().unwrap();
        assert_eq!(
            badge.trim(),
            r#"<span id="cart-count" class="cart-count">4</span>"#
        );

        let preview = cart_preview(&catalog, &cart);
        assert_eq!(preview.cart.lines.len(), 3);
        assert_eq!(preview.more, 1);
        assert!(preview.render().unwrap().contains("and 1 more"));
    }
}

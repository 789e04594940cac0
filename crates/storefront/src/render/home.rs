//! Home page renderer.

use acumen_core::Cart;
use askama::Template;

use super::{
    CollectionCard, Fragment, LayoutView, PostCard, ProductCard, RenderError, add_intents,
};
use crate::catalog::{Catalog, ProductFilter};
use crate::filters;

/// Featured products shown on the home page.
const FEATURED_LIMIT: usize = 4;

/// Journal entries shown on the home page.
const LATEST_POSTS: usize = 3;

#[derive(Template)]
#[template(path = "pages/home.html")]
struct HomeTemplate {
    title: String,
    layout: LayoutView,
    featured: Vec<ProductCard>,
    collections: Vec<CollectionCard>,
    posts: Vec<PostCard>,
}

/// Render the home page: featured watches, collections, latest journal posts.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn home(catalog: &Catalog, cart: &Cart) -> Result<Fragment, RenderError> {
    let featured: Vec<ProductCard> = catalog
        .list_products(&ProductFilter::featured(FEATURED_LIMIT))
        .into_iter()
        .map(|product| ProductCard::new(product, cart))
        .collect();
    let intents = add_intents(&featured);

    let template = HomeTemplate {
        title: "Timepieces of Distinction".to_string(),
        layout: LayoutView::new(catalog, cart),
        featured,
        collections: catalog.collections().iter().map(CollectionCard::from).collect(),
        posts: catalog
            .posts()
            .iter()
            .take(LATEST_POSTS)
            .map(PostCard::from)
            .collect(),
    };

    Ok(Fragment::found(template.title.clone(), template.render()?, intents))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use acumen_core::ProductId;

    use super::*;

    #[test]
    fn test_home_lists_featured_products_and_collections() {
        let catalog = Catalog::builtin().unwrap();
        let fragment = home(&catalog, &Cart::new()).unwrap();

        assert!(!fragment.is_not_found());
        assert!(fragment.html.contains("Axion Heritage Chronometer"));
        assert!(fragment.html.contains("Titanium Series"));
        assert!(fragment.html.contains("Guide to Limited Editions"));
        assert!(fragment.offers(&ProductId::new("axion01")));
        // Not featured.
        assert!(!fragment.offers(&ProductId::new("imperial04")));
    }

    #[test]
    fn test_home_shows_cart_count_in_header() {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = Cart::new();
        let product = catalog
            .find_product_by_id(&ProductId::new("nova02"))
            .unwrap();
        cart.add(acumen_core::CartLine {
            product_id: product.id.clone(),
            quantity: 3,
            price_snapshot: product.price,
            name_snapshot: product.name.clone(),
            image_snapshot: product.primary_image().to_owned(),
        });

        let fragment = home(&catalog, &cart).unwrap();
        assert!(fragment.html.contains(r#"<span id="cart-count" class="cart-count">3</span>"#));
    }
}

//! Filename-based page router.
//!
//! The storefront keeps the URL layout of a static site: every page is a file
//! name (`collection.html`, `product.html?id=...`). The router maps the last
//! path segment to a [`Page`] and calls the matching renderer. Anything it
//! does not recognise is [`Page::Other`] and left to the static file service.

use acumen_core::{Cart, CollectionId, PostSlug, ProductId};
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::render::{self, Fragment, RenderError};

/// Page kinds the storefront renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Collection,
    ProductDetail,
    Blog,
    Cart,
    Other,
}

impl Page {
    /// Classify a request path by its last segment.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let file = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();

        match file {
            "" | "index" | "index.html" => Self::Home,
            "collection.html" | "collections.html" => Self::Collection,
            "product.html" => Self::ProductDetail,
            "blog.html" => Self::Blog,
            "cart.html" => Self::Cart,
            _ => Self::Other,
        }
    }
}

/// Query parameters understood by the pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteParams {
    pub id: Option<String>,
    pub collection: Option<String>,
    pub post: Option<String>,
    pub sku: Option<String>,
}

impl RouteParams {
    fn collection_id(&self) -> Option<CollectionId> {
        non_empty(self.id.as_deref())
            .or_else(|| non_empty(self.collection.as_deref()))
            .map(CollectionId::from)
    }

    fn post_slug(&self) -> Option<PostSlug> {
        non_empty(self.id.as_deref())
            .or_else(|| non_empty(self.post.as_deref()))
            .map(PostSlug::from)
    }

    /// Product id from `id`, or from `sku` looked up in the catalog.
    ///
    /// An unknown sku is passed through as an id so the page reports it as
    /// not found.
    fn product_id(&self, catalog: &Catalog) -> Option<ProductId> {
        if let Some(id) = non_empty(self.id.as_deref()) {
            return Some(ProductId::from(id));
        }
        let sku = non_empty(self.sku.as_deref())?;
        Some(
            catalog
                .find_product_by_sku(sku)
                .map_or_else(|| ProductId::from(sku), |product| product.id.clone()),
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Render `page`, or return `None` for [`Page::Other`].
pub fn dispatch(
    page: Page,
    params: &RouteParams,
    catalog: &Catalog,
    cart: &Cart,
) -> Option<Result<Fragment, RenderError>> {
    let fragment = match page {
        Page::Home => render::home(catalog, cart),
        Page::Collection => render::collection(catalog, cart, params.collection_id().as_ref()),
        Page::ProductDetail => {
            render::product_detail(catalog, cart, params.product_id(catalog).as_ref())
        }
        Page::Blog => render::blog(catalog, cart, params.post_slug().as_ref()),
        Page::Cart => render::cart_page(catalog, cart),
        Page::Other => return None,
    };
    Some(fragment)
}

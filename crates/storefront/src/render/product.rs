//! Product detail renderer.

use acumen_core::{Cart, Product, ProductId, Spec};
use askama::Template;

use super::{
    Fragment, Intent, LayoutView, NavLink, ProductCard, RenderError, add_intents,
    collection_href, not_found,
};
use crate::catalog::{Catalog, ProductFilter};
use crate::filters;

/// Related products shown under the detail view.
const RELATED_LIMIT: usize = 3;

/// Product detail data for templates.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub long_description: String,
    pub price: String,
    /// Never empty: a placeholder stands in for missing images.
    pub images: Vec<String>,
    pub collection: Option<NavLink>,
    pub sku: Option<String>,
    pub specs: Vec<Spec>,
    pub in_cart: u32,
}

impl ProductDetailView {
    fn new(catalog: &Catalog, product: &Product, cart: &Cart) -> Self {
        let images = if product.images.is_empty() {
            vec![product.primary_image().to_owned()]
        } else {
            product.images.clone()
        };

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            long_description: if product.long_description.is_empty() {
                product.short_description.clone()
            } else {
                product.long_description.clone()
            },
            price: product.price.display(),
            images,
            collection: product
                .collection
                .as_ref()
                .and_then(|id| catalog.find_collection(id))
                .map(|collection| NavLink {
                    label: collection.name.clone(),
                    href: collection_href(&collection.id),
                }),
            sku: product.sku.clone(),
            specs: product.specs.clone(),
            in_cart: cart.line(&product.id).map_or(0, |line| line.quantity),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/product.html")]
struct ProductTemplate {
    title: String,
    layout: LayoutView,
    product: ProductDetailView,
    related: Vec<ProductCard>,
}

/// Render a product's detail page.
///
/// A missing or unknown id yields a "Product not found" fragment.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn product_detail(
    catalog: &Catalog,
    cart: &Cart,
    product_id: Option<&ProductId>,
) -> Result<Fragment, RenderError> {
    let layout = LayoutView::new(catalog, cart);

    let Some(product) = product_id.and_then(|id| catalog.find_product_by_id(id)) else {
        return not_found(
            layout,
            "Product not found",
            "The watch you're looking for isn't in our catalog.",
            "/collection.html",
            "Browse the collections",
        );
    };

    let related: Vec<ProductCard> = product
        .collection
        .as_ref()
        .map(|collection| {
            catalog
                .list_products(&ProductFilter::in_collection(collection.clone()))
                .into_iter()
                .filter(|candidate| candidate.id != product.id)
                .take(RELATED_LIMIT)
                .map(|candidate| ProductCard::new(candidate, cart))
                .collect()
        })
        .unwrap_or_default();

    let mut intents = vec![Intent::AddToCart {
        product_id: product.id.clone(),
    }];
    intents.extend(add_intents(&related));

    let template = ProductTemplate {
        title: product.name.clone(),
        layout,
        product: ProductDetailView::new(catalog, product, cart),
        related,
    };

    Ok(Fragment::found(template.title.clone(), template.render()?, intents))
}

//! Pure view renderers.
//!
//! Each renderer takes the catalog, a cart snapshot and route parameters and
//! returns a [`Fragment`]: rendered HTML plus the [`Intent`]s its controls
//! declare. Renderers never touch the cart engine; the HTTP shell wires the
//! declared intents to cart operations.
//!
//! Unknown or missing identifiers produce a [`FragmentStatus::NotFound`]
//! fragment rather than an error. The only error is a template failure.

pub mod blog;
pub mod cart;
pub mod collection;
pub mod home;
pub mod product;

use acumen_core::{
    BlogPost, Cart, Collection, CollectionId, ContactInfo, PostSlug, Product, ProductId,
    SocialLink,
};
use askama::Template;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::filters;

pub use blog::blog;
pub use cart::{CartView, cart_badge, cart_page, cart_preview};
pub use collection::collection;
pub use home::home;
pub use product::product_detail;

/// Rendering failure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Whether the fragment shows the requested record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentStatus {
    Found,
    NotFound,
}

/// A user action a rendered control asks the host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddToCart { product_id: ProductId },
    UpdateQuantity { product_id: ProductId },
    RemoveLine { product_id: ProductId },
    ClearCart,
}

/// Rendered output of a view.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub status: FragmentStatus,
    pub title: String,
    pub html: String,
    pub intents: Vec<Intent>,
}

impl Fragment {
    #[must_use]
    pub fn found(title: impl Into<String>, html: String, intents: Vec<Intent>) -> Self {
        Self {
            status: FragmentStatus::Found,
            title: title.into(),
            html,
            intents,
        }
    }

    #[must_use]
    pub fn not_found(title: impl Into<String>, html: String) -> Self {
        Self {
            status: FragmentStatus::NotFound,
            title: title.into(),
            html,
            intents: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == FragmentStatus::NotFound
    }

    /// Whether the fragment declares an add-to-cart control for a product.
    #[must_use]
    pub fn offers(&self, product_id: &ProductId) -> bool {
        self.intents.iter().any(|intent| {
            matches!(intent, Intent::AddToCart { product_id: id } if id == product_id)
        })
    }
}

// =============================================================================
// Shared view models
// =============================================================================

/// Navigation link.
#[derive(Clone)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

/// Header and footer data shared by every full page.
#[derive(Clone)]
pub struct LayoutView {
    pub cart_count: u32,
    pub collections: Vec<NavLink>,
    pub contact: ContactInfo,
    pub social: Vec<SocialLink>,
}

impl LayoutView {
    #[must_use]
    pub fn new(catalog: &Catalog, cart: &Cart) -> Self {
        Self {
            cart_count: cart.item_count(),
            collections: catalog
                .collections()
                .iter()
                .map(|collection| NavLink {
                    label: collection.name.clone(),
                    href: collection_href(&collection.id),
                })
                .collect(),
            contact: catalog.contact().clone(),
            social: catalog.social().to_vec(),
        }
    }
}

/// Product summary for grids.
#[derive(Clone)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub short_description: String,
    pub price: String,
    pub image: String,
    pub href: String,
    pub in_cart: u32,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, cart: &Cart) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            short_description: product.short_description.clone(),
            price: product.price.display(),
            image: product.primary_image().to_owned(),
            href: product_href(&product.id),
            in_cart: cart.line(&product.id).map_or(0, |line| line.quantity),
        }
    }
}

/// Collection summary for grids.
#[derive(Clone)]
pub struct CollectionCard {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub href: String,
}

impl From<&Collection> for CollectionCard {
    fn from(collection: &Collection) -> Self {
        Self {
            name: collection.name.clone(),
            description: collection.description.clone(),
            image: collection.hero_image.clone(),
            href: collection_href(&collection.id),
        }
    }
}

/// Blog post summary.
#[derive(Clone)]
pub struct PostCard {
    pub title: String,
    pub excerpt: String,
    pub published_on: String,
    pub author: Option<String>,
    pub read_time: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub href: String,
}

impl From<&BlogPost> for PostCard {
    fn from(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            published_on: post.published_on.format("%B %-d, %Y").to_string(),
            author: post.author.clone(),
            read_time: format!("{} min read", post.read_time_minutes),
            image: post.image.clone(),
            tags: post.tags.clone(),
            href: post_href(&post.slug),
        }
    }
}

fn add_intents<'a>(cards: impl IntoIterator<Item = &'a ProductCard>) -> Vec<Intent> {
    cards
        .into_iter()
        .map(|card| Intent::AddToCart {
            product_id: ProductId::new(card.id.as_str()),
        })
        .collect()
}

#[must_use]
pub fn product_href(id: &ProductId) -> String {
    format!("/product.html?id={id}")
}

#[must_use]
pub fn collection_href(id: &CollectionId) -> String {
    format!("/collection.html?id={id}")
}

#[must_use]
pub fn post_href(slug: &PostSlug) -> String {
    format!("/blog.html?id={slug}")
}

// =============================================================================
// Not found
// =============================================================================

/// Full-page "not found" view.
#[derive(Template)]
#[template(path = "pages/not_found.html")]
struct NotFoundTemplate<'a> {
    title: &'a str,
    layout: LayoutView,
    message: &'a str,
    back_href: &'a str,
    back_label: &'a str,
}

/// Render a "not found" fragment for a missing record.
fn not_found(
    layout: LayoutView,
    title: &str,
    message: &str,
    back_href: &str,
    back_label: &str,
) -> Result<Fragment, RenderError> {
    let html = NotFoundTemplate {
        title,
        layout,
        message,
        back_href,
        back_label,
    }
    .render()?;
    Ok(Fragment::not_found(title, html))
}

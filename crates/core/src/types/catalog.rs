//! Read-only catalog records: products, collections, blog posts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::{CollectionId, PostSlug, ProductId};
use super::price::Price;

/// Image shown wherever a product has no images of its own.
pub const PLACEHOLDER_IMAGE: &str = "/assets/images/placeholder.svg";

/// A labelled product attribute (movement, water resistance, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
    pub label: String,
    pub value: String,
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    pub price: Price,
    /// Ordered image URLs; the first one is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub collection: Option<CollectionId>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub featured: bool,
    /// Display order is preserved.
    #[serde(default)]
    pub specs: Vec<Spec>,
}

impl Product {
    /// The first image, or [`PLACEHOLDER_IMAGE`] when the product has none.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(PLACEHOLDER_IMAGE, String::as_str)
    }

    /// Whether the product belongs to the given collection.
    #[must_use]
    pub fn in_collection(&self, collection: &CollectionId) -> bool {
        self.collection.as_ref() == Some(collection)
    }
}

/// A curated group of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hero_image: Option<String>,
}

/// A journal entry shown on the blog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub slug: PostSlug,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    pub published_on: NaiveDate,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub read_time_minutes: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Customer-service contact details shown in the footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// A link to one of the brand's social profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub network: String,
    pub url: String,
}

//! Catalog store for products, collections and blog posts.
//!
//! The catalog is literal data: the bundled `catalog/acumen.json` is embedded
//! into the binary and parsed once at startup. An alternate file can be loaded
//! with [`Catalog::load`]. After construction the catalog is read-only and
//! cheap to clone.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use acumen_core::{
    BlogPost, Collection, CollectionId, ContactInfo, PostSlug, Price, PriceError, Product,
    ProductId, SocialLink,
};
use serde::Deserialize;
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../catalog/acumen.json");

/// Errors raised while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    #[error("Duplicate collection id: {0}")]
    DuplicateCollection(CollectionId),

    #[error("Product {product} references unknown collection {collection}")]
    UnknownCollection {
        product: ProductId,
        collection: CollectionId,
    },

    #[error("Product {product} has an invalid price: {source}")]
    InvalidPrice {
        product: ProductId,
        #[source]
        source: PriceError,
    },
}

/// Raw catalog file layout.
#[derive(Debug, Deserialize)]
struct CatalogData {
    #[serde(default)]
    collections: Vec<Collection>,
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    posts: Vec<BlogPost>,
    #[serde(default)]
    contact: ContactInfo,
    #[serde(default)]
    social: Vec<SocialLink>,
}

/// Criteria for [`Catalog::list_products`].
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Only products in this collection.
    pub collection: Option<CollectionId>,
    /// Only products flagged as featured.
    pub featured_only: bool,
    /// At most this many products.
    pub limit: Option<usize>,
}

impl ProductFilter {
    /// Products belonging to one collection.
    #[must_use]
    pub fn in_collection(collection: CollectionId) -> Self {
        Self {
            collection: Some(collection),
            ..Self::default()
        }
    }

    /// Featured products, capped at `limit`.
    #[must_use]
    pub fn featured(limit: usize) -> Self {
        Self {
            featured_only: true,
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn matches(&self, product: &Product) -> bool {
        if self.featured_only && !product.featured {
            return false;
        }
        self.collection
            .as_ref()
            .is_none_or(|collection| product.in_collection(collection))
    }
}

/// In-memory catalog shared by renderers and the cart engine.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
    collections: Arc<Vec<Collection>>,
    posts: Arc<Vec<BlogPost>>,
    contact: Arc<ContactInfo>,
    social: Arc<Vec<SocialLink>>,
}

impl Catalog {
    /// Build a catalog from records, validating ids and references.
    ///
    /// Posts are stored newest first.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids, a product pointing at an unknown
    /// collection, or a negative price.
    pub fn new(
        products: Vec<Product>,
        collections: Vec<Collection>,
        mut posts: Vec<BlogPost>,
        contact: ContactInfo,
        social: Vec<SocialLink>,
    ) -> Result<Self, CatalogError> {
        let mut collection_ids = HashSet::new();
        for collection in &collections {
            if !collection_ids.insert(&collection.id) {
                return Err(CatalogError::DuplicateCollection(collection.id.clone()));
            }
        }

        let mut product_ids = HashSet::new();
        for product in &products {
            if !product_ids.insert(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
            if let Some(collection) = &product.collection
                && !collection_ids.contains(collection)
            {
                return Err(CatalogError::UnknownCollection {
                    product: product.id.clone(),
                    collection: collection.clone(),
                });
            }
            Price::try_new(product.price.amount, product.price.currency_code).map_err(
                |source| CatalogError::InvalidPrice {
                    product: product.id.clone(),
                    source,
                },
            )?;
            if product.images.is_empty() {
                tracing::warn!(product_id = %product.id, "Product has no images; placeholder will be used");
            }
        }

        posts.sort_by(|a, b| b.published_on.cmp(&a.published_on));

        Ok(Self {
            products: Arc::new(products),
            collections: Arc::new(collections),
            posts: Arc::new(posts),
            contact: Arc::new(contact),
            social: Arc::new(social),
        })
    }

    /// A catalog with no records at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            products: Arc::new(Vec::new()),
            collections: Arc::new(Vec::new()),
            posts: Arc::new(Vec::new()),
            contact: Arc::new(ContactInfo::default()),
            social: Arc::new(Vec::new()),
        }
    }

    /// Parse a catalog from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(raw)?;
        Self::new(
            data.products,
            data.collections,
            data.posts,
            data.contact,
            data.social,
        )
    }

    /// The catalog bundled with the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data is invalid.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find_product_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Look up a product by stock-keeping unit.
    #[must_use]
    pub fn find_product_by_sku(&self, sku: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|product| product.sku.as_deref() == Some(sku))
    }

    /// Products matching a filter, in catalog order.
    #[must_use]
    pub fn list_products(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| filter.matches(product))
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect()
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    #[must_use]
    pub fn find_collection(&self, id: &CollectionId) -> Option<&Collection> {
        self.collections
            .iter()
            .find(|collection| &collection.id == id)
    }

    /// Blog posts, newest first.
    #[must_use]
    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    #[must_use]
    pub fn find_post(&self, slug: &PostSlug) -> Option<&BlogPost> {
        self.posts.iter().find(|post| &post.slug == slug)
    }

    #[must_use]
    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    #[must_use]
    pub fn social(&self) -> &[SocialLink] {
        &self.social
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.products().len(), 4);
        assert_eq!(catalog.collections().len(), 4);
        assert_eq!(catalog.posts().len(), 3);
        assert_eq!(catalog.contact().email, "support@acumenwatches.com");
    }

    #[test]
    fn test_find_product_by_id_and_sku() {
        let catalog = Catalog::builtin().unwrap();
        let product = catalog
            .find_product_by_id(&ProductId::new("axion01"))
            .unwrap();
        assert_eq!(product.name, "Axion Heritage Chronometer");
        assert_eq!(
            catalog.find_product_by_sku("ACM-TI-NV02").map(|p| p.id.as_str()),
            Some("nova02")
        );
        assert!(catalog.find_product_by_id(&ProductId::new("nope")).is_none());
    }

    #[test]
    fn test_list_products_filters() {
        let catalog = Catalog::builtin().unwrap();

        let heritage =
            catalog.list_products(&ProductFilter::in_collection(CollectionId::new("heritage")));
        assert_eq!(heritage.len(), 1);
        assert_eq!(heritage[0].id.as_str(), "axion01");

        let featured = catalog.list_products(&ProductFilter::featured(2));
        assert_eq!(featured.len(), 2);
        assert!(featured.iter().all(|p| p.featured));

        assert_eq!(catalog.list_products(&ProductFilter::default()).len(), 4);
    }

    #[test]
    fn test_posts_are_newest_first() {
        let catalog = Catalog::builtin().unwrap();
        let slugs: Vec<&str> = catalog.posts().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec!["collectors-guide", "material-science", "craftsmanship-evolution"]
        );
    }

    #[test]
    fn test_duplicate_product_rejected() {
        let raw = r#"{
            "products": [
                {"id": "w1", "name": "A", "price": {"amount": "1", "currency_code": "USD"}},
                {"id": "w1", "name": "B", "price": {"amount": "2", "currency_code": "USD"}}
            ]
        }"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::DuplicateProduct(_))
        ));
    }

    #[test]
    fn test_unknown_collection_rejected() {
        let raw = r#"{
            "products": [
                {"id": "w1", "name": "A", "collection": "ghost",
                 "price": {"amount": "1", "currency_code": "USD"}}
            ]
        }"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::UnknownCollection { .. })
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let raw = r#"{
            "products": [
                {"id": "w1", "name": "A", "price": {"amount": "-5", "currency_code": "USD"}}
            ]
        }"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_product_without_images_is_accepted() {
        let raw = r#"{
            "products": [
                {"id": "w1", "name": "A", "price": {"amount": "1", "currency_code": "USD"}}
            ]
        }"#;
        let catalog = Catalog::from_json(raw).unwrap();
        let product = catalog.find_product_by_id(&ProductId::new("w1")).unwrap();
        assert_eq!(product.primary_image(), acumen_core::PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::empty();
        assert!(catalog.products().is_empty());
        assert!(catalog.find_product_by_id(&ProductId::new("w1")).is_none());
    }
}

//! Catalog commands.

use std::path::Path;

use acumen_core::CollectionId;
use acumen_storefront::catalog::{Catalog, ProductFilter};

use super::CliError;

/// Build a product filter from command-line flags.
pub fn filter(collection: Option<String>, featured: bool, limit: Option<usize>) -> ProductFilter {
    ProductFilter {
        collection: collection.map(CollectionId::from),
        featured_only: featured,
        limit,
    }
}

/// One line per product: id, price, name, collection.
pub fn list(catalog: &Catalog, filter: &ProductFilter) -> String {
    let products = catalog.list_products(filter);
    if products.is_empty() {
        return "No products match.".to_string();
    }

    products
        .iter()
        .map(|product| {
            let mut line = format!(
                "{:<12} {:>14}  {}",
                product.id.as_str(),
                product.price.display(),
                product.name
            );
            if let Some(collection) = &product.collection {
                line.push_str(&format!(" [{collection}]"));
            }
            if product.featured {
                line.push_str(" *");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Load a catalog file and report what it contains.
pub fn validate_file(path: &Path) -> Result<String, CliError> {
    let catalog = Catalog::load(path)?;
    tracing::info!(path = %path.display(), "Catalog is valid");
    Ok(summary(&catalog))
}

/// Record counts for a loaded catalog.
pub fn summary(catalog: &Catalog) -> String {
    let missing_images = catalog
        .products()
        .iter()
        .filter(|product| product.images.is_empty())
        .count();

    let mut out = format!(
        "OK: {} products, {} collections, {} posts",
        catalog.products().len(),
        catalog.collections().len(),
        catalog.posts().len()
    );
    if missing_images > 0 {
        out.push_str(&format!(" ({missing_images} without images)"));
    }
    out
}

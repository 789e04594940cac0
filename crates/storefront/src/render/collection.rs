//! Collection page renderer.

use acumen_core::{Cart, CollectionId};
use askama::Template;

use super::{
    CollectionCard, Fragment, LayoutView, ProductCard, RenderError, add_intents, not_found,
};
use crate::catalog::{Catalog, ProductFilter};
use crate::filters;

#[derive(Template)]
#[template(path = "pages/collection.html")]
struct CollectionTemplate {
    title: String,
    layout: LayoutView,
    heading: String,
    description: Option<String>,
    hero_image: Option<String>,
    collections: Vec<CollectionCard>,
    products: Vec<ProductCard>,
}

/// Render one collection, or every collection when `collection_id` is `None`.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn collection(
    catalog: &Catalog,
    cart: &Cart,
    collection_id: Option<&CollectionId>,
) -> Result<Fragment, RenderError> {
    let layout = LayoutView::new(catalog, cart);

    let template = match collection_id {
        Some(id) => {
            let Some(collection) = catalog.find_collection(id) else {
                return not_found(
                    layout,
                    "Collection not found",
                    "We couldn't find that collection. It may have been retired.",
                    "/collection.html",
                    "View all collections",
                );
            };
            CollectionTemplate {
                title: collection.name.clone(),
                layout,
                heading: collection.name.clone(),
                description: Some(collection.description.clone())
                    .filter(|description| !description.is_empty()),
                hero_image: collection.hero_image.clone(),
                collections: Vec::new(),
                products: cards(catalog, cart, &ProductFilter::in_collection(id.clone())),
            }
        }
        None => CollectionTemplate {
            title: "Collections".to_string(),
            layout,
            heading: "All Collections".to_string(),
            description: None,
            hero_image: None,
            collections: catalog.collections().iter().map(CollectionCard::from).collect(),
            products: cards(catalog, cart, &ProductFilter::default()),
        },
    };

    let intents = add_intents(&template.products);
    Ok(Fragment::found(template.title.clone(), template.render()?, intents))
}

fn cards(catalog: &Catalog, cart: &Cart, filter: &ProductFilter) -> Vec<ProductCard> {
    catalog
        .list_products(filter)
        .into_iter()
        .map(|product| ProductCard::new(product, cart))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use acumen_core::ProductId;

    use super::*;

    #[test]
    fn test_single_collection_shows_only_its_products() {
        let catalog = Catalog::builtin().unwrap();
        let id = CollectionId::new("titanium");
        let fragment = collection(&catalog, &Cart::new(), Some(&id)).unwrap();

        assert!(!fragment.is_not_found());
        assert_eq!(fragment.title, "Titanium Series");
        assert!(fragment.html.contains("Nova Titanium Sport"));
        assert!(!fragment.html.contains("Imperial Midnight Tourbillon"));
        assert_eq!(fragment.intents.len(), 1);
        assert!(fragment.offers(&ProductId::new("nova02")));
    }

    #[test]
    fn test_all_collections_when_no_id() {
        let catalog = Catalog::builtin().unwrap();
        let fragment = collection(&catalog, &Cart::new(), None).unwrap();

        assert_eq!(fragment.intents.len(), 4);
        assert!(fragment.html.contains("Heritage Collection"));
        assert!(fragment.html.contains("Limited Edition"));
    }

    #[test]
    fn test_unknown_collection_is_not_found() {
        let catalog = Catalog::builtin().unwrap();
        let id = CollectionId::new("sundials");
        let fragment = collection(&catalog, &Cart::new(), Some(&id)).unwrap();

        assert!(fragment.is_not_found());
        assert!(fragment.html.contains("Collection not found"));
        assert!(fragment.intents.is_empty());
    }
}

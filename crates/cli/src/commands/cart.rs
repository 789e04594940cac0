//! Cart commands.
//!
//! These open the same storage the server uses. Run them while the server is
//! stopped: the server only reads the cart at startup.

use acumen_core::ProductId;
use acumen_storefront::cart::{CartEngine, FileStorage};
use acumen_storefront::config::StorefrontConfig;

use super::CliError;

/// Open the persisted cart from the configured data directory.
pub fn open(config: &StorefrontConfig) -> Result<CartEngine<FileStorage>, CliError> {
    let catalog = config.load_catalog()?;
    let storage = FileStorage::open(&config.data_dir)?;
    Ok(CartEngine::load(catalog, storage))
}

/// Lines, item count and subtotal.
pub fn show(engine: &CartEngine<FileStorage>) -> String {
    let cart = engine.cart();
    if cart.is_empty() {
        return "Cart is empty.".to_string();
    }

    let mut out: Vec<String> = cart
        .lines()
        .iter()
        .map(|line| {
            format!(
                "{:>3} x {:<36} {:>14}",
                line.quantity,
                line.name_snapshot,
                line.line_total().display()
            )
        })
        .collect();
    let count = engine.item_count();
    out.push(format!(
        "{count} {}, subtotal {}",
        if count == 1 { "item" } else { "items" },
        engine.subtotal().display()
    ));
    out.join("\n")
}

/// Add a product.
///
/// # Errors
///
/// Returns an error if the product is unknown or the cart could not be saved.
pub fn add(
    engine: &mut CartEngine<FileStorage>,
    product_id: &str,
    quantity: i64,
) -> Result<String, CliError> {
    let product_id = ProductId::from(product_id);
    let new_quantity = engine.add(&product_id, quantity)?;
    ensure_saved(engine)?;
    Ok(format!("{product_id}: {new_quantity} in cart"))
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the cart could not be saved.
pub fn remove(engine: &mut CartEngine<FileStorage>, product_id: &str) -> Result<String, CliError> {
    let product_id = ProductId::from(product_id);
    if !engine.remove(&product_id) {
        return Ok(format!("{product_id} is not in the cart"));
    }
    ensure_saved(engine)?;
    Ok(format!("Removed {product_id}"))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart could not be saved.
pub fn clear(engine: &mut CartEngine<FileStorage>) -> Result<String, CliError> {
    if !engine.clear() {
        return Ok("Cart is already empty".to_string());
    }
    ensure_saved(engine)?;
    Ok("Cart cleared".to_string())
}

fn ensure_saved(engine: &CartEngine<FileStorage>) -> Result<(), CliError> {
    if engine.persistence_degraded() {
        return Err(CliError::NotPersisted(
            engine.storage().dir().display().to_string(),
        ));
    }
    Ok(())
}

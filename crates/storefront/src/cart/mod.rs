//! Cart engine: the only owner of the session cart.
//!
//! Every state-changing operation runs the same sequence: mutate the in-memory
//! [`Cart`], write the full record to storage, then broadcast one
//! [`CartChanged`]. Operations that change nothing skip both the write and the
//! notification. A failed write is logged and flagged, never propagated; the
//! in-memory cart stays authoritative for the rest of the session.

pub mod storage;

use acumen_core::{Cart, CartLine, CurrencyCode, Price, ProductId};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::catalog::Catalog;

pub use storage::{CART_STORAGE_KEY, CartStorage, FileStorage, MemoryStorage, StorageError};

/// Buffered notifications per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 64;

/// Reasons an add request is refused. The cart is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Cart is priced in {expected}, product {product} is priced in {found}")]
    CurrencyMismatch {
        product: ProductId,
        expected: CurrencyCode,
        found: CurrencyCode,
    },
}

/// Broadcast after every committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartChanged {
    pub lines: Vec<CartLine>,
    pub item_count: u32,
    pub subtotal: Price,
    /// `false` when the storage write for this mutation failed.
    pub persisted: bool,
}

/// Owns the cart, its storage, and the change channel.
#[derive(Debug)]
pub struct CartEngine<S> {
    catalog: Catalog,
    storage: S,
    cart: Cart,
    events: broadcast::Sender<CartChanged>,
    degraded: bool,
}

impl<S: CartStorage> CartEngine<S> {
    /// Hydrate from storage.
    ///
    /// Absent data gives an empty cart. Malformed data or a failed read is
    /// logged and also gives an empty cart.
    pub fn load(catalog: Catalog, storage: S) -> Self {
        let cart = match storage.read(CART_STORAGE_KEY) {
            Ok(Some(raw)) => Cart::decode(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable saved cart");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read saved cart; starting empty");
                Cart::new()
            }
        };

        tracing::debug!(
            lines = cart.lines().len(),
            item_count = cart.item_count(),
            "Cart loaded"
        );

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            catalog,
            storage,
            cart,
            events,
            degraded: false,
        }
    }

    /// Add `quantity` of a product. Non-positive quantities count as 1.
    ///
    /// Returns the line's quantity after the add.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ProductNotFound`] if the catalog has no such
    /// product, or [`CartError::CurrencyMismatch`] if the product is priced
    /// in a different currency than the lines already in the cart.
    pub fn add(&mut self, product_id: &ProductId, quantity: i64) -> Result<u32, CartError> {
        let product = self
            .catalog
            .find_product_by_id(product_id)
            .ok_or_else(|| CartError::ProductNotFound(product_id.clone()))?;

        if let Some(expected) = self.cart.currency()
            && expected != product.price.currency_code
        {
            return Err(CartError::CurrencyMismatch {
                product: product_id.clone(),
                expected,
                found: product.price.currency_code,
            });
        }

        let line = CartLine {
            product_id: product.id.clone(),
            quantity: clamp_quantity(quantity, 1),
            price_snapshot: product.price,
            name_snapshot: product.name.clone(),
            image_snapshot: product.primary_image().to_owned(),
        };

        let new_quantity = self.cart.add(line);
        tracing::debug!(product_id = %product_id, quantity = new_quantity, "Added to cart");
        self.commit();
        Ok(new_quantity)
    }

    /// Remove a product's line. Returns `false` (and does nothing) if absent.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        if self.cart.remove(product_id).is_none() {
            return false;
        }
        tracing::debug!(product_id = %product_id, "Removed from cart");
        self.commit();
        true
    }

    /// Set a line's quantity to `max(0, quantity)`; zero removes the line.
    ///
    /// Returns `false` (and does nothing) if the line is absent or already
    /// has that quantity.
    pub fn update(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        let quantity = clamp_quantity(quantity, 0);
        if !self.cart.set_quantity(product_id, quantity) {
            return false;
        }
        tracing::debug!(product_id = %product_id, quantity, "Updated cart line");
        self.commit();
        true
    }

    /// Empty the cart. Returns `false` if it was already empty.
    pub fn clear(&mut self) -> bool {
        if !self.cart.clear() {
            return false;
        }
        tracing::debug!("Cleared cart");
        self.commit();
        true
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.cart.subtotal()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Borrow the current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// An owned copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Receive a [`CartChanged`] after every committed mutation.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.events.subscribe()
    }

    /// Whether the most recent write failed.
    #[must_use]
    pub const fn persistence_degraded(&self) -> bool {
        self.degraded
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Persist, then notify.
    fn commit(&mut self) {
        let persisted = match self.persist() {
            Ok(()) => {
                if self.degraded {
                    tracing::info!("Cart persistence recovered");
                }
                self.degraded = false;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save cart; keeping in-memory state");
                self.degraded = true;
                false
            }
        };

        let event = CartChanged {
            lines: self.cart.lines().to_vec(),
            item_count: self.cart.item_count(),
            subtotal: self.cart.subtotal(),
            persisted,
        };

        // No subscribers is fine.
        if let Ok(receivers) = self.events.send(event) {
            tracing::trace!(receivers, "Cart change broadcast");
        }
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let raw = self.cart.encode()?;
        self.storage.write(CART_STORAGE_KEY, &raw)
    }
}

/// Convert a caller-supplied quantity to `u32`, raising it to at least `floor`.
fn clamp_quantity(quantity: i64, floor: u32) -> u32 {
    u32::try_from(quantity.max(i64::from(floor))).unwrap_or(u32::MAX)
}

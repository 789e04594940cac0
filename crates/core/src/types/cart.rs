//! Cart model and its persisted record.
//!
//! [`Cart`] is a pure value: it enforces the line invariants (at most one line
//! per product, no zero quantities, insertion order preserved) but performs no
//! I/O. Persistence and change notification live in the storefront's cart
//! engine, which wraps this type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{CurrencyCode, Price};

/// Version written into every [`PersistedCart`].
pub const PERSISTED_CART_VERSION: u32 = 1;

/// Errors produced when decoding a persisted cart.
#[derive(thiserror::Error, Debug)]
pub enum CartDecodeError {
    #[error("malformed cart record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported cart record version {0}")]
    UnsupportedVersion(u32),

    #[error("cart line for {0} has zero quantity")]
    ZeroQuantity(ProductId),

    #[error("cart contains more than one line for {0}")]
    DuplicateLine(ProductId),

    #[error("cart line for {0} has a negative price")]
    NegativePrice(ProductId),

    #[error("cart line for {product} is priced in {found:?}, expected {expected:?}")]
    MixedCurrency {
        product: ProductId,
        expected: CurrencyCode,
        found: CurrencyCode,
    },

    #[error("cart total overflows at line {0}")]
    AmountOverflow(ProductId),
}

/// One product's accumulated quantity, with the display fields captured when
/// it was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    /// Always at least 1.
    pub quantity: u32,
    /// Unit price (and currency) at add-time.
    pub price_snapshot: Price,
    pub name_snapshot: String,
    pub image_snapshot: String,
}

impl CartLine {
    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price_snapshot.times(self.quantity)
    }
}

/// An ordered set of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product, if any.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |total, line| total.saturating_add(line.quantity))
    }

    /// Currency shared by every line, `None` for an empty cart.
    #[must_use]
    pub fn currency(&self) -> Option<CurrencyCode> {
        self.lines.first().map(|line| line.price_snapshot.currency_code)
    }

    /// Sum of unit price times quantity across all lines.
    ///
    /// An empty cart reports zero in the default currency. Saturates rather
    /// than overflowing.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let currency = self.currency().unwrap_or_default();
        let amount = self.lines.iter().fold(Decimal::ZERO, |total, line| {
            total.saturating_add(line.line_total().amount)
        });
        Price::new(amount, currency)
    }

    /// Add a line, merging with an existing line for the same product.
    ///
    /// A quantity of zero is treated as one. Returns the line's quantity after
    /// the merge.
    pub fn add(&mut self, line: CartLine) -> u32 {
        let quantity = line.quantity.max(1);

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|existing| existing.product_id == line.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return existing.quantity;
        }

        self.lines.push(CartLine { quantity, ..line });
        quantity
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// Returns `false` when the line does not exist or already has that
    /// quantity.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id).is_some();
        }

        match self
            .lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
        {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove the line for a product, returning it if it existed.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartLine> {
        let index = self
            .lines
            .iter()
            .position(|line| &line.product_id == product_id)?;
        Some(self.lines.remove(index))
    }

    /// Remove every line. Returns `false` if the cart was already empty.
    pub fn clear(&mut self) -> bool {
        if self.lines.is_empty() {
            return false;
        }
        self.lines.clear();
        true
    }

    /// Convert to the flat persisted record.
    #[must_use]
    pub fn to_persisted(&self) -> PersistedCart {
        PersistedCart {
            version: PERSISTED_CART_VERSION,
            lines: self.lines.iter().map(PersistedLine::from).collect(),
        }
    }

    /// Rebuild a cart from a persisted record, re-checking the line invariants.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown record version, a zero quantity, a
    /// negative price, two lines for the same product, lines in different
    /// currencies, or amounts whose total does not fit in a `Decimal`.
    pub fn from_persisted(record: PersistedCart) -> Result<Self, CartDecodeError> {
        if record.version != PERSISTED_CART_VERSION {
            return Err(CartDecodeError::UnsupportedVersion(record.version));
        }

        let mut lines: Vec<CartLine> = Vec::with_capacity(record.lines.len());
        let mut total = Decimal::ZERO;
        for persisted in record.lines {
            if persisted.quantity == 0 {
                return Err(CartDecodeError::ZeroQuantity(persisted.product_id));
            }
            if persisted.price_snapshot.is_sign_negative() && !persisted.price_snapshot.is_zero()
            {
                return Err(CartDecodeError::NegativePrice(persisted.product_id));
            }
            if lines
                .iter()
                .any(|line| line.product_id == persisted.product_id)
            {
                return Err(CartDecodeError::DuplicateLine(persisted.product_id));
            }
            if let Some(first) = lines.first() {
                let expected = first.price_snapshot.currency_code;
                if persisted.currency_snapshot != expected {
                    return Err(CartDecodeError::MixedCurrency {
                        product: persisted.product_id,
                        expected,
                        found: persisted.currency_snapshot,
                    });
                }
            }
            match persisted
                .price_snapshot
                .checked_mul(Decimal::from(persisted.quantity))
                .and_then(|line_total| total.checked_add(line_total))
            {
                Some(sum) => total = sum,
                None => return Err(CartDecodeError::AmountOverflow(persisted.product_id)),
            }
            lines.push(persisted.into());
        }

        Ok(Self { lines })
    }

    /// Serialize the persisted record as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_persisted())
    }

    /// Parse and validate a JSON persisted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the record is invalid.
    pub fn decode(raw: &str) -> Result<Self, CartDecodeError> {
        let record: PersistedCart = serde_json::from_str(raw)?;
        Self::from_persisted(record)
    }
}

/// The record written to storage: a version tag and flat line entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCart {
    pub version: u32,
    pub lines: Vec<PersistedLine>,
}

/// A single flat cart line as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_snapshot: Decimal,
    pub currency_snapshot: CurrencyCode,
    pub name_snapshot: String,
    pub image_snapshot: String,
}

impl From<&CartLine> for PersistedLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            price_snapshot: line.price_snapshot.amount,
            currency_snapshot: line.price_snapshot.currency_code,
            name_snapshot: line.name_snapshot.clone(),
            image_snapshot: line.image_snapshot.clone(),
        }
    }
}

impl From<PersistedLine> for CartLine {
    fn from(line: PersistedLine) -> Self {
        Self {
            product_id: line.product_id,
            quantity: line.quantity,
            price_snapshot: Price::new(line.price_snapshot, line.currency_snapshot),
            name_snapshot: line.name_snapshot,
            image_snapshot: line.image_snapshot,
        }
    }
}

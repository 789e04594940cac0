//! Core types for Acumen.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod price;

pub use cart::{
    Cart, CartDecodeError, CartLine, PERSISTED_CART_VERSION, PersistedCart, PersistedLine,
};
pub use catalog::{
    BlogPost, Collection, ContactInfo, PLACEHOLDER_IMAGE, Product, SocialLink, Spec,
};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};

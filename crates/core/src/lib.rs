//! Acumen Core - Shared domain types.
//!
//! This crate provides the types used across all Acumen components:
//! - `storefront` - Catalog store, cart engine, renderers and the HTTP shell
//! - `cli` - Command-line tools for inspecting the catalog and the saved cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no storage,
//! no HTTP. Cart invariants (one line per product, no zero quantities) are
//! enforced here so that every caller gets them for free.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, prices, catalog records and the cart model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

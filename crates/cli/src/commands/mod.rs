//! CLI command implementations.
//!
//! Commands return their output as a string; `main` prints it.

pub mod cart;
pub mod catalog;

use acumen_storefront::cart::{CartError, StorageError};
use acumen_storefront::catalog::CatalogError;
use acumen_storefront::config::{ConfigError, StorefrontConfig};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Cart(#[from] CartError),

    /// The cart changed in memory but could not be saved.
    #[error("Cart could not be saved to {0}")]
    NotPersisted(String),
}

/// Load configuration the same way the server does.
pub fn load_config() -> Result<StorefrontConfig, CliError> {
    Ok(StorefrontConfig::from_env()?)
}

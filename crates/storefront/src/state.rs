//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, broadcast};

use crate::cart::{CartChanged, CartEngine, CartStorage};
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;

/// Storage backend behind the shared engine.
pub type DynStorage = Box<dyn CartStorage + Send>;

/// The engine type held in [`AppState`].
pub type SharedEngine = CartEngine<DynStorage>;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The cart engine sits behind an async mutex,
/// so cart operations run one at a time in arrival order.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: Mutex<SharedEngine>,
}

impl AppState {
    /// Create application state, hydrating the cart from `storage`.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, storage: DynStorage) -> Self {
        let engine = CartEngine::load(catalog.clone(), storage);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(engine),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Lock the cart engine.
    pub async fn cart(&self) -> MutexGuard<'_, SharedEngine> {
        self.inner.cart.lock().await
    }

    /// Subscribe to cart change notifications.
    pub async fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.cart().await.subscribe()
    }
}

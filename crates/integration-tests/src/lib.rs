//! Integration tests for the Acumen storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p acumen-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_engine` - Cart engine properties and persistence against real storage
//! - `http_shell` - Pages, cart fragments and static files through the axum router
//!
//! [`TestApp`] drives the router in-process with `tower::ServiceExt::oneshot`;
//! no socket is opened. Each app gets its own temporary data directory.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;

use acumen_storefront::cart::{CART_STORAGE_KEY, FileStorage};
use acumen_storefront::catalog::Catalog;
use acumen_storefront::config::StorefrontConfig;
use acumen_storefront::state::AppState;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

/// The storefront's static directory, independent of the working directory.
#[must_use]
pub fn static_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static"))
}

/// A fully wired storefront backed by a temporary data directory.
pub struct TestApp {
    pub state: AppState,
    router: Router,
    data_dir: TempDir,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Value of a response header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    /// Storefront with the bundled catalog and an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(Catalog::builtin().unwrap())
    }

    /// Storefront with a custom catalog.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        let data_dir = tempfile::tempdir().unwrap();
        Self::open(catalog, data_dir)
    }

    /// Storefront reusing an existing data directory, as after a restart.
    #[must_use]
    pub fn restart(self) -> Self {
        let catalog = self.state.catalog().clone();
        Self::open(catalog, self.data_dir)
    }

    fn open(catalog: Catalog, data_dir: TempDir) -> Self {
        let config = StorefrontConfig {
            data_dir: data_dir.path().to_path_buf(),
            static_dir: static_dir(),
            ..StorefrontConfig::default()
        };
        let storage = FileStorage::open(&config.data_dir).unwrap();
        let state = AppState::new(config, catalog, Box::new(storage));
        let router = acumen_storefront::app(state.clone());
        Self {
            state,
            router,
            data_dir,
        }
    }

    /// Raw persisted cart record, if one has been written.
    #[must_use]
    pub fn persisted_cart(&self) -> Option<serde_json::Value> {
        let path = self
            .data_dir
            .path()
            .join(format!("{CART_STORAGE_KEY}.json"));
        let raw = std::fs::read_to_string(path).ok()?;
        Some(serde_json::from_str(&raw).unwrap())
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// POST a form the way HTMX does.
    pub async fn post_htmx(&self, uri: &str, form: &str) -> TestResponse {
        let request = form_request(uri, form)
            .header("HX-Request", "true")
            .body(Body::from(form.to_owned()))
            .unwrap();
        self.send(request).await
    }

    /// POST a form without JavaScript.
    pub async fn post_plain(&self, uri: &str, form: &str) -> TestResponse {
        let request = form_request(uri, form)
            .body(Body::from(form.to_owned()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

fn form_request(uri: &str, form: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .header("content-length", form.len())
}

//! Integration tests for the cart engine.
//!
//! These run the engine against real storage backends and check the
//! properties every sequence of cart operations must keep.

#![allow(clippy::unwrap_used)]

use acumen_core::{Cart, ProductId};
use acumen_storefront::cart::{CART_STORAGE_KEY, CartEngine, FileStorage, MemoryStorage};
use acumen_storefront::catalog::Catalog;
use tokio::sync::broadcast::error::TryRecvError;

fn catalog() -> Catalog {
    Catalog::builtin().unwrap()
}

fn id(s: &str) -> ProductId {
    ProductId::new(s)
}

fn assert_consistent(cart: &Cart) {
    let sum: u32 = cart.lines().iter().map(|line| line.quantity).sum();
    assert_eq!(cart.item_count(), sum);
    assert!(cart.lines().iter().all(|line| line.quantity >= 1));
}

// =============================================================================
// Property Tests
// =============================================================================

/// Deterministic pseudo-random sequence (64-bit LCG).
struct Sequence(u64);

impl Sequence {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound
    }
}

#[test]
fn test_item_count_matches_lines_for_any_sequence() {
    let ids = ["axion01", "nova02", "zenith03", "imperial04", "missing"];

    for seed in 0..20 {
        let mut engine = CartEngine::load(catalog(), MemoryStorage::new());
        let mut sequence = Sequence(seed);

        for _ in 0..200 {
            let product = id(ids[usize::try_from(sequence.next(5)).unwrap()]);
            let quantity = i64::try_from(sequence.next(7)).unwrap() - 2;
            match sequence.next(4) {
                0 => {
                    let _ = engine.add(&product, quantity);
                }
                1 => {
                    engine.remove(&product);
                }
                2 => {
                    engine.update(&product, quantity);
                }
                _ => {
                    if sequence.next(10) == 0 {
                        engine.clear();
                    }
                }
            }
            assert_consistent(engine.cart());
        }
    }
}

#[test]
fn test_repeated_add_merges_into_one_line() {
    let mut engine = CartEngine::load(catalog(), MemoryStorage::new());

    engine.add(&id("zenith03"), 2).unwrap();
    engine.add(&id("zenith03"), 4).unwrap();

    assert_eq!(engine.cart().lines().len(), 1);
    assert_eq!(engine.cart().line(&id("zenith03")).unwrap().quantity, 6);
}

#[test]
fn test_update_to_zero_equals_remove() {
    let mut via_update = CartEngine::load(catalog(), MemoryStorage::new());
    let mut via_remove = CartEngine::load(catalog(), MemoryStorage::new());

    for engine in [&mut via_update, &mut via_remove] {
        engine.add(&id("axion01"), 1).unwrap();
        engine.add(&id("nova02"), 3).unwrap();
    }

    let mut update_events = via_update.subscribe();
    let mut remove_events = via_remove.subscribe();

    assert!(via_update.update(&id("axion01"), 0));
    assert!(via_remove.remove(&id("axion01")));

    assert_eq!(via_update.cart(), via_remove.cart());
    assert_eq!(via_update.storage().writes(), via_remove.storage().writes());
    assert_eq!(
        via_update.storage().get(CART_STORAGE_KEY),
        via_remove.storage().get(CART_STORAGE_KEY)
    );
    assert_eq!(update_events.try_recv().unwrap(), remove_events.try_recv().unwrap());
}

#[test]
fn test_remove_absent_is_silent() {
    let mut engine = CartEngine::load(catalog(), MemoryStorage::new());
    engine.add(&id("axion01"), 1).unwrap();
    let writes = engine.storage().writes();
    let mut events = engine.subscribe();

    assert!(!engine.remove(&id("nova02")));

    assert_eq!(engine.storage().writes(), writes);
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn test_unknown_product_leaves_cart_untouched() {
    let mut engine = CartEngine::load(catalog(), MemoryStorage::new());
    engine.add(&id("nova02"), 1).unwrap();
    let before = engine.snapshot();
    let mut events = engine.subscribe();

    assert!(engine.add(&id("unknown-id"), 1).is_err());

    assert_eq!(engine.cart(), &before);
    assert_eq!(engine.storage().writes(), 1);
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_notification_follows_write() {
    let mut engine = CartEngine::load(catalog(), MemoryStorage::new());
    let mut events = engine.subscribe();

    engine.add(&id("imperial04"), 1).unwrap();

    let event = events.try_recv().unwrap();
    assert!(event.persisted);
    let saved = Cart::decode(engine.storage().get(CART_STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(saved.lines(), event.lines.as_slice());
}

#[test]
fn test_file_storage_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let mut engine = CartEngine::load(catalog(), FileStorage::open(dir.path()).unwrap());
    engine.add(&id("axion01"), 2).unwrap();
    engine.add(&id("nova02"), 1).unwrap();
    engine.update(&id("nova02"), 4);
    let expected = engine.snapshot();
    drop(engine);

    let reloaded = CartEngine::load(catalog(), FileStorage::open(dir.path()).unwrap());
    assert_eq!(reloaded.cart(), &expected);
    assert_eq!(reloaded.item_count(), 6);
}

#[test]
fn test_corrupt_file_gives_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(format!("{CART_STORAGE_KEY}.json")), "{not json").unwrap();

    let engine = CartEngine::load(catalog(), FileStorage::open(dir.path()).unwrap());
    assert!(engine.cart().is_empty());
}

#[test]
fn test_snapshot_keeps_retired_products() {
    let dir = tempfile::tempdir().unwrap();

    let mut engine = CartEngine::load(catalog(), FileStorage::open(dir.path()).unwrap());
    engine.add(&id("imperial04"), 1).unwrap();
    drop(engine);

    // Same storage, catalog without the limited edition.
    let smaller = Catalog::from_json(
        r#"{"products": [{"id": "axion01", "name": "Axion Heritage Chronometer",
            "price": {"amount": "8999.00", "currency_code": "USD"}}]}"#,
    )
    .unwrap();
    let engine = CartEngine::load(smaller, FileStorage::open(dir.path()).unwrap());

    let line = engine.cart().line(&id("imperial04")).unwrap();
    assert_eq!(line.name_snapshot, "Imperial Midnight Tourbillon");
    assert_eq!(engine.subtotal().display(), "$24,999.00");
}

// =============================================================================
// Scenario
// =============================================================================

#[test]
fn test_add_update_remove_scenario() {
    let catalog = Catalog::from_json(
        r#"{"products": [{"id": "w1", "name": "W1",
            "price": {"amount": "120.00", "currency_code": "USD"}}]}"#,
    )
    .unwrap();
    let mut engine = CartEngine::load(catalog, MemoryStorage::new());

    engine.add(&id("w1"), 2).unwrap();
    assert_eq!(engine.subtotal().display(), "$240.00");

    engine.add(&id("w1"), 3).unwrap();
    assert_eq!(engine.cart().line(&id("w1")).unwrap().quantity, 5);

    engine.update(&id("w1"), 1);
    assert_eq!(engine.cart().line(&id("w1")).unwrap().quantity, 1);

    engine.update(&id("w1"), 0);
    assert!(engine.cart().is_empty());
    assert_eq!(engine.item_count(), 0);
}

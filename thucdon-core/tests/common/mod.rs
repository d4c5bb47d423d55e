//! Shared fixtures for the conversion service tests.

#![allow(dead_code)]

use std::sync::Arc;
use thucdon_core::{
    Amount, CategoryId, ConversionConfig, MemoryStore, UnitConversionService, UnitId, UnitStore,
};

/// A small hand-built store with `g` and `ml` as base units.
pub struct GramBase {
    pub store: Arc<MemoryStore>,
    pub service: UnitConversionService,
    pub mass: CategoryId,
    pub volume: CategoryId,
    pub count: CategoryId,
    pub g: UnitId,
    pub kg: UnitId,
    pub oz: UnitId,
    pub ml: UnitId,
    pub l: UnitId,
    pub piece: UnitId,
    pub dozen: UnitId,
}

impl GramBase {
    pub fn new() -> Self {
        Self::with_config(ConversionConfig::default())
    }

    pub fn with_config(config: ConversionConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let mass = store.add_category("mass");
        let volume = store.add_category("volume");
        let count = store.add_category("count");

        let g = store.add_unit("g", mass, true, Amount::ONE);
        let kg = store.add_unit("kg", mass, false, Amount::from(1000));
        let oz = store.add_unit("oz", mass, false, amount("28.349523125"));
        let ml = store.add_unit("ml", volume, true, Amount::ONE);
        let l = store.add_unit("l", volume, false, Amount::from(1000));
        let piece = store.add_unit("piece", count, true, Amount::ONE);
        let dozen = store.add_unit("dozen", count, false, Amount::from(12));

        let service = UnitConversionService::with_config(store.clone(), config);
        Self {
            store,
            service,
            mass,
            volume,
            count,
            g,
            kg,
            oz,
            ml,
            l,
            piece,
            dozen,
        }
    }
}

/// The embedded catalog loaded into a fresh store.
pub struct Seeded {
    pub store: Arc<MemoryStore>,
    pub service: UnitConversionService,
}

impl Seeded {
    pub fn new() -> Self {
        let store = Arc::new(
            MemoryStore::from_catalog(unit_catalog::catalog()).expect("catalog should seed"),
        );
        let service = UnitConversionService::new(store.clone());
        Self { store, service }
    }

    pub async fn unit(&self, symbol: &str) -> UnitId {
        self.store
            .find_unit_by_symbol(symbol)
            .await
            .expect("store available")
            .unwrap_or_else(|| panic!("unit '{}' should be seeded", symbol))
            .id
    }
}

pub fn amount(s: &str) -> Amount {
    s.parse().expect("valid decimal literal")
}

pub fn assert_close(actual: Amount, expected: Amount, tolerance: &str) {
    assert!(
        actual.abs_diff(expected) <= amount(tolerance),
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}

//! In-memory unit store.
//!
//! Backs the CLI and tests. Can be seeded from the embedded catalog, built up
//! record by record, and told to fail so store-error handling can be exercised.

use super::UnitStore;
use crate::amount::Amount;
use crate::error::StoreError;
use crate::types::{
    CategoryId, DirectConversion, IngredientId, IngredientUnitMapping, Unit, UnitCategory, UnitId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use unit_catalog::Catalog;

#[derive(Debug, Default)]
struct Tables {
    categories: HashMap<CategoryId, UnitCategory>,
    units: HashMap<UnitId, Unit>,
    conversions: HashMap<(UnitId, UnitId), DirectConversion>,
    mappings: HashMap<(IngredientId, UnitId), IngredientUnitMapping>,
    /// Catalog ingredient name -> id assigned at seed time
    seeded_ingredients: HashMap<String, IngredientId>,
}

#[derive(Debug, Default)]
struct Counters {
    unit_lookups: AtomicU32,
    direct_conversion_lookups: AtomicU32,
    mapping_lookups: AtomicU32,
    mapping_writes: AtomicU32,
}

/// Snapshot of how many queries each lookup family has served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryCounts {
    pub unit_lookups: u32,
    pub direct_conversion_lookups: u32,
    pub mapping_lookups: u32,
    pub mapping_writes: u32,
}

/// A `UnitStore` held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    /// When set, every trait call fails with `StoreError::Unavailable`
    unavailable: RwLock<Option<String>>,
    counters: Counters,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding every category, unit, edge, and ingredient
    /// mapping from the catalog. Catalog ingredients get fresh ids, available
    /// through [`MemoryStore::seeded_ingredient`].
    pub fn from_catalog(catalog: &Catalog) -> Result<Self, StoreError> {
        let store = Self::new();

        let mut categories = HashMap::new();
        for category in &catalog.categories {
            let id = store.add_category_with_description(&category.name, category.description.clone());
            categories.insert(category.name.as_str(), id);
        }

        let mut units = HashMap::new();
        for unit in &catalog.units {
            let category_id = *categories.get(unit.category.as_str()).ok_or_else(|| {
                StoreError::NotFound(format!("category '{}' for unit '{}'", unit.category, unit.symbol))
            })?;
            let id = UnitId::new();
            store.insert_unit(Unit {
                id,
                symbol: unit.symbol.clone(),
                name_vi: unit.name_vi.clone(),
                name_en: unit.name_en.clone(),
                plural_vi: unit.plural_vi.clone(),
                plural_en: unit.plural_en.clone(),
                category_id,
                is_base_unit: unit.is_base_unit,
                factor_to_base: Amount::new(unit.factor_to_base),
            });
            units.insert(unit.symbol.as_str(), id);
        }

        let lookup = |symbol: &str| {
            units
                .get(symbol)
                .copied()
                .ok_or_else(|| StoreError::NotFound(format!("unit '{}'", symbol)))
        };

        for edge in &catalog.conversions {
            store.add_direct_conversion(
                lookup(&edge.from)?,
                lookup(&edge.to)?,
                Amount::new(edge.factor),
            );
        }

        for ingredient in &catalog.ingredients {
            let ingredient_id = IngredientId::new();
            for mapping in &ingredient.mappings {
                store.insert_mapping(IngredientUnitMapping::new(
                    ingredient_id,
                    lookup(&mapping.count_unit)?,
                    lookup(&mapping.measurable_unit)?,
                    Amount::new(mapping.quantity),
                ));
            }
            store
                .write()
                .seeded_ingredients
                .insert(ingredient.name.clone(), ingredient_id);
        }

        Ok(store)
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        let unavailable = self
            .unavailable
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match unavailable.as_ref() {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    /// Make every subsequent call fail (`Some(reason)`) or succeed again (`None`).
    pub fn set_unavailable(&self, reason: Option<&str>) {
        *self
            .unavailable
            .write()
            .unwrap_or_else(PoisonError::into_inner) = reason.map(str::to_string);
    }

    pub fn query_counts(&self) -> QueryCounts {
        QueryCounts {
            unit_lookups: self.counters.unit_lookups.load(Ordering::Relaxed),
            direct_conversion_lookups: self
                .counters
                .direct_conversion_lookups
                .load(Ordering::Relaxed),
            mapping_lookups: self.counters.mapping_lookups.load(Ordering::Relaxed),
            mapping_writes: self.counters.mapping_writes.load(Ordering::Relaxed),
        }
    }

    /// Id assigned to a catalog ingredient by [`MemoryStore::from_catalog`].
    pub fn seeded_ingredient(&self, name: &str) -> Option<IngredientId> {
        self.read().seeded_ingredients.get(name).copied()
    }

    pub fn add_category(&self, name: &str) -> CategoryId {
        self.add_category_with_description(name, None)
    }

    fn add_category_with_description(&self, name: &str, description: Option<String>) -> CategoryId {
        let id = CategoryId::new();
        self.write().categories.insert(
            id,
            UnitCategory {
                id,
                name: name.to_string(),
                description,
            },
        );
        id
    }

    /// Add a unit whose display names all equal its symbol.
    pub fn add_unit(
        &self,
        symbol: &str,
        category_id: CategoryId,
        is_base_unit: bool,
        factor_to_base: Amount,
    ) -> UnitId {
        let id = UnitId::new();
        self.insert_unit(Unit {
            id,
            symbol: symbol.to_string(),
            name_vi: symbol.to_string(),
            name_en: symbol.to_string(),
            plural_vi: symbol.to_string(),
            plural_en: symbol.to_string(),
            category_id,
            is_base_unit,
            factor_to_base,
        });
        id
    }

    pub fn insert_unit(&self, unit: Unit) {
        self.write().units.insert(unit.id, unit);
    }

    pub fn add_direct_conversion(&self, from: UnitId, to: UnitId, factor: Amount) {
        self.write().conversions.insert(
            (from, to),
            DirectConversion {
                from_unit_id: from,
                to_unit_id: to,
                factor,
            },
        );
    }

    /// Write a mapping directly, bypassing any service cache. Simulates an
    /// edit made by another process.
    pub fn insert_mapping(&self, mapping: IngredientUnitMapping) {
        self.write()
            .mappings
            .insert((mapping.ingredient_id, mapping.count_unit_id), mapping);
    }
}

#[async_trait]
impl UnitStore for MemoryStore {
    async fn get_unit(&self, id: UnitId) -> Result<Option<Unit>, StoreError> {
        self.check_available()?;
        self.counters.unit_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.read().units.get(&id).cloned())
    }

    async fn find_unit_by_symbol(&self, symbol: &str) -> Result<Option<Unit>, StoreError> {
        self.check_available()?;
        self.counters.unit_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .read()
            .units
            .values()
            .find(|u| u.symbol == symbol)
            .cloned())
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<UnitCategory>, StoreError> {
        self.check_available()?;
        Ok(self.read().categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<UnitCategory>, StoreError> {
        self.check_available()?;
        let mut categories: Vec<UnitCategory> = self.read().categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_direct_conversion(
        &self,
        from: UnitId,
        to: UnitId,
    ) -> Result<Option<DirectConversion>, StoreError> {
        self.check_available()?;
        self.counters
            .direct_conversion_lookups
            .fetch_add(1, Ordering::Relaxed);
        Ok(self.read().conversions.get(&(from, to)).cloned())
    }

    async fn insert_direct_conversions(
        &self,
        edges: Vec<DirectConversion>,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut tables = self.write();
        if let Some(existing) = edges
            .iter()
            .find(|e| tables.conversions.contains_key(&(e.from_unit_id, e.to_unit_id)))
        {
            return Err(StoreError::Conflict(format!(
                "conversion {} -> {} already exists",
                existing.from_unit_id, existing.to_unit_id
            )));
        }
        for edge in edges {
            tables
                .conversions
                .insert((edge.from_unit_id, edge.to_unit_id), edge);
        }
        Ok(())
    }

    async fn find_base_unit(&self, category: CategoryId) -> Result<Option<Unit>, StoreError> {
        self.check_available()?;
        self.counters.unit_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .read()
            .units
            .values()
            .find(|u| u.category_id == category && u.is_base_unit)
            .cloned())
    }

    async fn list_units_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Unit>, StoreError> {
        self.check_available()?;
        let mut units: Vec<Unit> = self
            .read()
            .units
            .values()
            .filter(|u| u.category_id == category)
            .cloned()
            .collect();
        // Base unit first, then smallest to largest
        units.sort_by(|a, b| {
            b.is_base_unit
                .cmp(&a.is_base_unit)
                .then(a.factor_to_base.cmp(&b.factor_to_base))
                .then(a.symbol.cmp(&b.symbol))
        });
        Ok(units)
    }

    async fn find_ingredient_mapping(
        &self,
        ingredient: IngredientId,
        count_unit: UnitId,
    ) -> Result<Option<IngredientUnitMapping>, StoreError> {
        self.check_available()?;
        self.counters.mapping_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.read().mappings.get(&(ingredient, count_unit)).cloned())
    }

    async fn upsert_ingredient_mapping(
        &self,
        mapping: IngredientUnitMapping,
    ) -> Result<IngredientUnitMapping, StoreError> {
        self.check_available()?;
        self.counters.mapping_writes.fetch_add(1, Ordering::Relaxed);
        self.insert_mapping(mapping.clone());
        Ok(mapping)
    }

    async fn delete_ingredient_mapping(
        &self,
        ingredient: IngredientId,
        count_unit: UnitId,
    ) -> Result<Option<IngredientUnitMapping>, StoreError> {
        self.check_available()?;
        self.counters.mapping_writes.fetch_add(1, Ordering::Relaxed);
        Ok(self.write().mappings.remove(&(ingredient, count_unit)))
    }

    async fn list_ingredient_mappings(
        &self,
        ingredient: IngredientId,
    ) -> Result<Vec<IngredientUnitMapping>, StoreError> {
        self.check_available()?;
        let mut mappings: Vec<IngredientUnitMapping> = self
            .read()
            .mappings
            .values()
            .filter(|m| m.ingredient_id == ingredient)
            .cloned()
            .collect();
        mappings.sort_by_key(|m| m.count_unit_id);
        Ok(mappings)
    }
}

//! Data store abstraction for units, conversion edges, and ingredient mappings.
//!
//! The conversion service only talks to the store through [`UnitStore`], so the
//! surrounding application can back it with whatever database it uses. Timeouts
//! and retries belong to the implementation, not the service.

mod memory;

pub use memory::{MemoryStore, QueryCounts};

use crate::error::StoreError;
use crate::types::{
    CategoryId, DirectConversion, IngredientId, IngredientUnitMapping, Unit, UnitCategory, UnitId,
};
use async_trait::async_trait;
use std::fmt;

/// Trait for unit data stores.
///
/// Lookups return `Ok(None)` for a missing record; `Err` is reserved for the
/// store itself failing.
#[async_trait]
pub trait UnitStore: Send + Sync + fmt::Debug {
    /// Fetch a unit by id.
    async fn get_unit(&self, id: UnitId) -> Result<Option<Unit>, StoreError>;

    /// Fetch a unit by its display symbol (e.g. "g", "ml").
    async fn find_unit_by_symbol(&self, symbol: &str) -> Result<Option<Unit>, StoreError>;

    /// Fetch a unit category by id.
    async fn get_category(&self, id: CategoryId) -> Result<Option<UnitCategory>, StoreError>;

    /// All categories.
    async fn list_categories(&self) -> Result<Vec<UnitCategory>, StoreError>;

    /// Find a direct conversion edge `from -> to`.
    async fn find_direct_conversion(
        &self,
        from: UnitId,
        to: UnitId,
    ) -> Result<Option<DirectConversion>, StoreError>;

    /// Insert a set of direct conversion edges atomically.
    ///
    /// Fails with [`StoreError::Conflict`] and writes nothing if any
    /// `(from, to)` pair already has an edge.
    async fn insert_direct_conversions(
        &self,
        edges: Vec<DirectConversion>,
    ) -> Result<(), StoreError>;

    /// Find the base unit of a category.
    async fn find_base_unit(&self, category: CategoryId) -> Result<Option<Unit>, StoreError>;

    /// All units in a category.
    async fn list_units_by_category(&self, category: CategoryId)
        -> Result<Vec<Unit>, StoreError>;

    /// Find the mapping for `(ingredient, count_unit)`.
    async fn find_ingredient_mapping(
        &self,
        ingredient: IngredientId,
        count_unit: UnitId,
    ) -> Result<Option<IngredientUnitMapping>, StoreError>;

    /// Insert or replace the mapping keyed by `(ingredient_id, count_unit_id)`.
    async fn upsert_ingredient_mapping(
        &self,
        mapping: IngredientUnitMapping,
    ) -> Result<IngredientUnitMapping, StoreError>;

    /// Delete the mapping for `(ingredient, count_unit)`, returning it if it existed.
    async fn delete_ingredient_mapping(
        &self,
        ingredient: IngredientId,
        count_unit: UnitId,
    ) -> Result<Option<IngredientUnitMapping>, StoreError>;

    /// All mappings for an ingredient.
    async fn list_ingredient_mappings(
        &self,
        ingredient: IngredientId,
    ) -> Result<Vec<IngredientUnitMapping>, StoreError>;
}

//! The unit conversion service.
//!
//! Entry points escalate from cheap to expensive: identity, cached factor,
//! direct edge, base-unit path ([`convert`](UnitConversionService::convert)),
//! then density bridging and ingredient mappings on top of that.
//!
//! Failures come back as [`ConversionError`] values, never panics. Store
//! failures are normalized into [`ConversionError::Store`] at this boundary.

mod convert;
mod density;
mod edges;
mod mapping;

pub use mapping::BulkMappingOutcome;

use crate::amount::Amount;
use crate::cache::{CacheStats, FactorCache, MappingCache};
use crate::config::ConversionConfig;
use crate::error::{ConversionError, StoreError};
use crate::store::UnitStore;
use crate::types::{Unit, UnitCategory, UnitId};
use std::sync::Arc;

/// Converts quantities between units using a [`UnitStore`].
///
/// Each instance owns its caches; two services over the same store share
/// nothing.
#[derive(Debug)]
pub struct UnitConversionService {
    store: Arc<dyn UnitStore>,
    config: ConversionConfig,
    factors: FactorCache,
    mappings: MappingCache,
}

impl UnitConversionService {
    /// Create a service with the default configuration.
    pub fn new(store: Arc<dyn UnitStore>) -> Self {
        Self::with_config(store, ConversionConfig::default())
    }

    pub fn with_config(store: Arc<dyn UnitStore>, config: ConversionConfig) -> Self {
        let mappings = MappingCache::new(config.mapping_cache_ttl);
        Self {
            store,
            config,
            factors: FactorCache::new(),
            mappings,
        }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Every unit sharing `unit`'s category, including `unit` itself.
    ///
    /// An unknown unit has no compatible units.
    pub async fn compatible_units(&self, unit: UnitId) -> Result<Vec<UnitId>, ConversionError> {
        let Some(unit) = self
            .store
            .get_unit(unit)
            .await
            .map_err(|e| store_failure("get_unit", e))?
        else {
            return Ok(Vec::new());
        };

        let units = self
            .store
            .list_units_by_category(unit.category_id)
            .await
            .map_err(|e| store_failure("list_units_by_category", e))?;
        Ok(units.into_iter().map(|u| u.id).collect())
    }

    /// Whether `convert` would succeed for this pair.
    pub async fn can_convert(&self, from: UnitId, to: UnitId) -> bool {
        self.convert(Amount::ONE, from, to).await.is_ok()
    }

    /// Drop both caches.
    pub fn clear_cache(&self) {
        self.factors.clear();
        self.mappings.clear();
        tracing::debug!("Conversion caches cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            factor_entries: self.factors.len(),
            mapping_entries: self.mappings.len(),
        }
    }

    async fn require_unit(&self, id: UnitId) -> Result<Unit, ConversionError> {
        self.store
            .get_unit(id)
            .await
            .map_err(|e| store_failure("get_unit", e))?
            .ok_or(ConversionError::UnitNotFound(id))
    }

    async fn category_of(&self, unit: &Unit) -> Result<UnitCategory, ConversionError> {
        self.store
            .get_category(unit.category_id)
            .await
            .map_err(|e| store_failure("get_category", e))?
            .ok_or(ConversionError::CategoryNotFound(unit.category_id))
    }
}

/// Log a store failure and convert it into the service error.
fn store_failure(operation: &'static str, error: StoreError) -> ConversionError {
    tracing::warn!(operation, error = %error, "Unit store call failed");
    ConversionError::Store(error)
}

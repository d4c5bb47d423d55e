//! In-memory caches owned by a conversion service instance.
//!
//! Two policies:
//!
//! - [`FactorCache`]: unit-to-unit ratios. Unbounded and never expires.
//!   Edges created through the service evict their pair; unit factors edited
//!   behind the service's back need [`FactorCache::clear`].
//! - [`MappingCache`]: ingredient mappings. Entries expire after a TTL and
//!   are evicted explicitly on every mapping write. A reader racing a write
//!   can still re-populate the old mapping just before the store commits;
//!   that mapping then lives at most one TTL.

use crate::amount::Amount;
use crate::error::ConversionError;
use crate::types::{IngredientId, IngredientUnitMapping, UnitId};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::fmt;
use std::time::{Duration, Instant};

/// An exact `numerator / denominator` conversion ratio.
///
/// Kept as a fraction so a cached conversion performs the same multiply then
/// divide as the uncached one and yields the same decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub numerator: Decimal,
    pub denominator: Decimal,
}

impl Ratio {
    pub fn new(numerator: Amount, denominator: Amount) -> Self {
        Self {
            numerator: numerator.value(),
            denominator: denominator.value(),
        }
    }

    /// `quantity * numerator / denominator`.
    pub fn apply(&self, quantity: Amount) -> Result<Amount, ConversionError> {
        quantity
            .checked_mul(Amount::new(self.numerator))?
            .checked_div(Amount::new(self.denominator))
    }
}

impl From<Amount> for Ratio {
    fn from(factor: Amount) -> Self {
        Self::new(factor, Amount::ONE)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.numerator.normalize(),
            self.denominator.normalize()
        )
    }
}

/// Memo of resolved `(from, to) -> ratio` pairs.
#[derive(Debug, Default)]
pub struct FactorCache {
    factors: DashMap<(UnitId, UnitId), Ratio>,
}

impl FactorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, from: UnitId, to: UnitId) -> Option<Ratio> {
        self.factors.get(&(from, to)).map(|r| *r)
    }

    /// Racing writers for the same key store the same ratio; last one wins.
    pub fn insert(&self, from: UnitId, to: UnitId, ratio: Ratio) {
        self.factors.insert((from, to), ratio);
    }

    /// Drop both directions of a unit pair.
    pub fn evict_pair(&self, a: UnitId, b: UnitId) {
        self.factors.remove(&(a, b));
        self.factors.remove(&(b, a));
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn clear(&self) {
        self.factors.clear();
    }
}

#[derive(Debug, Clone)]
struct CachedMapping {
    mapping: IngredientUnitMapping,
    inserted_at: Instant,
}

/// TTL cache of ingredient mappings keyed by `(ingredient, count_unit)`.
///
/// Only found mappings are cached; a miss always goes back to the store.
#[derive(Debug)]
pub struct MappingCache {
    ttl: Duration,
    entries: DashMap<(IngredientId, UnitId), CachedMapping>,
}

impl MappingCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    /// Get a live entry, evicting it if it has outlived the TTL.
    pub fn get(&self, ingredient: IngredientId, count_unit: UnitId) -> Option<IngredientUnitMapping> {
        let key = (ingredient, count_unit);
        let expired = match self.entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.mapping.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(&key);
        }
        None
    }

    pub fn insert(&self, mapping: IngredientUnitMapping) {
        self.entries.insert(
            (mapping.ingredient_id, mapping.count_unit_id),
            CachedMapping {
                mapping,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn evict(&self, ingredient: IngredientId, count_unit: UnitId) {
        self.entries.remove(&(ingredient, count_unit));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub factor_entries: usize,
    pub mapping_entries: usize,
}

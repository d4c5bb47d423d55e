//! Unit conversion engine for thucdon recipes.
//!
//! Converts quantities between units of the same category (mass, volume,
//! count), bridges mass and volume through an ingredient density, and applies
//! per-ingredient count mappings such as "1 quả trứng gà = 60 g".
//!
//! All arithmetic is exact decimal ([`Amount`]). Units and mappings come from
//! a [`UnitStore`]; [`MemoryStore`] can be seeded from the `unit-catalog`
//! crate.
//!
//! ```
//! use std::sync::Arc;
//! use thucdon_core::{Amount, MemoryStore, UnitConversionService};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(MemoryStore::new());
//! let mass = store.add_category("mass");
//! let g = store.add_unit("g", mass, true, Amount::ONE);
//! let kg = store.add_unit("kg", mass, false, Amount::from(1000));
//!
//! let service = UnitConversionService::new(store);
//! let converted = service.convert(Amount::from(1500), g, kg).await.unwrap();
//! assert_eq!(converted.value.to_string(), "1.5");
//! # }
//! ```

pub mod amount;
pub mod cache;
pub mod config;
pub mod error;
pub mod result;
pub mod service;
pub mod store;
pub mod types;

pub use amount::Amount;
pub use cache::{CacheStats, Ratio};
pub use config::{ConfigError, ConversionConfig};
pub use error::{ConversionError, ErrorKind, StoreError};
pub use result::{ConversionReport, ConversionResult, ConversionSource, Converted, IngredientConversion};
pub use service::{BulkMappingOutcome, UnitConversionService};
pub use store::{MemoryStore, QueryCounts, UnitStore};
pub use types::{
    CategoryId, CategoryKind, DirectConversion, IngredientId, IngredientUnitMapping, MappingDetails,
    MappingRequest, Unit, UnitCategory, UnitId,
};

//! Seed measurement units and reference ingredients for thucdon.
//!
//! This crate embeds the unit categories (mass, volume, count), their units
//! with `factor_to_base` values, the curated direct conversion edges, and a
//! small set of reference ingredients carrying densities (g/mL) and
//! count-unit mappings.
//!
//! # Example
//!
//! ```
//! use unit_catalog::{catalog, find_density};
//!
//! let kg = catalog().unit("kg").unwrap();
//! assert!(kg.is_base_unit);
//!
//! // Cooking oil is lighter than water
//! let oil = find_density("dầu ăn").unwrap();
//! assert!(oil < rust_decimal::Decimal::ONE);
//! ```

mod ingredient_lookup;
mod seed_data;

pub use ingredient_lookup::{find_density, find_ingredient};
pub use seed_data::{
    catalog, Catalog, CatalogCategory, CatalogConversion, CatalogIngredient, CatalogMapping,
    CatalogUnit,
};

//! Embedded seed data for measurement units.
//!
//! Factors are decimal strings so nothing passes through a float on the way
//! in. Categories are referenced by name and units by symbol; the store that
//! loads this data assigns its own ids.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::LazyLock;

/// A unit category ("mass", "volume", "count").
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogCategory {
    pub name: String,
    pub description: Option<String>,
}

/// A measurement unit as seeded.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogUnit {
    pub symbol: String,
    /// Name of the owning category.
    pub category: String,
    pub name_vi: String,
    pub name_en: String,
    pub plural_vi: String,
    pub plural_en: String,
    pub is_base_unit: bool,
    /// quantity-in-this-unit * factor = quantity-in-base-unit
    pub factor_to_base: Decimal,
}

/// A curated shortcut edge between two units, by symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConversion {
    pub from: String,
    pub to: String,
    pub factor: Decimal,
}

/// "One `count_unit` of this ingredient is `quantity` of `measurable_unit`."
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMapping {
    pub count_unit: String,
    pub measurable_unit: String,
    pub quantity: Decimal,
}

/// A reference ingredient with its density and count mappings.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogIngredient {
    pub name: String,
    pub name_en: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Grams per millilitre.
    pub density: Option<Decimal>,
    #[serde(default)]
    pub mappings: Vec<CatalogMapping>,
}

/// The full seed catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub categories: Vec<CatalogCategory>,
    pub units: Vec<CatalogUnit>,
    pub conversions: Vec<CatalogConversion>,
    pub ingredients: Vec<CatalogIngredient>,
}

impl Catalog {
    /// Look up a seeded unit by its exact symbol.
    pub fn unit(&self, symbol: &str) -> Option<&CatalogUnit> {
        self.units.iter().find(|u| u.symbol == symbol)
    }

    /// Units belonging to the named category, in seed order.
    pub fn units_in(&self, category: &str) -> impl Iterator<Item = &CatalogUnit> {
        let category = category.to_string();
        self.units.iter().filter(move |u| u.category == category)
    }

    /// The base unit of the named category.
    pub fn base_unit(&self, category: &str) -> Option<&CatalogUnit> {
        self.units_in(category).find(|u| u.is_base_unit)
    }
}

static UNITS_JSON: &str = include_str!("data/units.json");

static CATALOG: LazyLock<Catalog> =
    LazyLock::new(|| serde_json::from_str(UNITS_JSON).expect("units.json should be valid JSON"));

/// The embedded seed catalog, parsed on first use.
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

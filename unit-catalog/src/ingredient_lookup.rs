//! Reference ingredient lookup by free-text name.

use crate::seed_data::{catalog, CatalogIngredient};
use rust_decimal::Decimal;

/// Preparation and packaging notes stripped from names before matching.
const MODIFIERS_TO_STRIP: &[&str] = &[
    // Prefix
    "fresh ",
    "pure ",
    // Suffix
    " nguyên chất",
    " đóng chai",
    " loại 1",
    ", băm nhỏ",
    ", thái nhỏ",
    ", đánh tan",
    ", chopped",
    ", beaten",
];

fn normalize_name(s: &str) -> String {
    s.to_lowercase().trim().to_string()
}

/// Drop a trailing "(...)" note, e.g. "dầu ăn (chai 1l)" -> "dầu ăn".
fn strip_parenthetical(s: &str) -> String {
    match s.find('(') {
        Some(idx) if s.trim_end().ends_with(')') => s[..idx].trim_end().to_string(),
        _ => s.to_string(),
    }
}

fn strip_modifiers(s: &str) -> String {
    let mut result = strip_parenthetical(s);
    for modifier in MODIFIERS_TO_STRIP {
        if let Some(stripped) = result.strip_prefix(modifier) {
            result = stripped.to_string();
        }
        if let Some(stripped) = result.strip_suffix(modifier) {
            result = stripped.to_string();
        }
    }
    result
}

fn matches_name(ingredient: &CatalogIngredient, name: &str) -> bool {
    normalize_name(&ingredient.name) == name
        || normalize_name(&ingredient.name_en) == name
        || ingredient.aliases.iter().any(|a| normalize_name(a) == name)
}

fn lookup(name: &str) -> Option<&'static CatalogIngredient> {
    let ingredients = &catalog().ingredients;

    if let Some(found) = ingredients.iter().find(|i| matches_name(i, name)) {
        return Some(found);
    }

    // English plurals ("limes" -> "lime")
    let singular = name.strip_suffix('s')?;
    ingredients.iter().find(|i| matches_name(i, singular))
}

/// Find a reference ingredient by Vietnamese name, English name, or alias.
///
/// Lookup order:
/// 1. Case-insensitive match on name, English name, or alias
/// 2. Same, with a trailing English plural "s" removed
/// 3. After stripping parenthetical notes and preparation modifiers, retry 1-2
pub fn find_ingredient(name: &str) -> Option<&'static CatalogIngredient> {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return None;
    }

    if let Some(found) = lookup(&normalized) {
        return Some(found);
    }

    let stripped = strip_modifiers(&normalized);
    if stripped != normalized {
        return lookup(&stripped);
    }

    None
}

/// Density in grams per millilitre for a reference ingredient, if known.
pub fn find_density(name: &str) -> Option<Decimal> {
    find_ingredient(name).and_then(|i| i.density)
}

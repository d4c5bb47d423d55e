use anyhow::{anyhow, Result};
use std::collections::HashMap;
use thucdon_core::{Unit, UnitCategory, UnitId, UnitStore};

/// Every unit in the store, grouped by category, addressable by symbol.
pub struct UnitTable {
    pub categories: Vec<(UnitCategory, Vec<Unit>)>,
    by_id: HashMap<UnitId, Unit>,
}

impl UnitTable {
    pub async fn load(store: &dyn UnitStore) -> Result<Self> {
        let mut categories = Vec::new();
        let mut by_id = HashMap::new();

        for category in store.list_categories().await? {
            let units = store.list_units_by_category(category.id).await?;
            for unit in &units {
                by_id.insert(unit.id, unit.clone());
            }
            categories.push((category, units));
        }

        Ok(Self { categories, by_id })
    }

    /// Resolve a unit symbol, falling back to a case-insensitive match on
    /// symbol or Vietnamese/English names.
    pub fn resolve(&self, symbol: &str) -> Result<&Unit> {
        let symbol = symbol.trim();
        let units = || self.categories.iter().flat_map(|(_, units)| units.iter());

        units()
            .find(|u| u.symbol == symbol)
            .or_else(|| {
                let lower = symbol.to_lowercase();
                units().find(|u| {
                    u.symbol.to_lowercase() == lower
                        || u.name_vi.to_lowercase() == lower
                        || u.name_en.to_lowercase() == lower
                        || u.plural_en.to_lowercase() == lower
                })
            })
            .ok_or_else(|| anyhow!("Unknown unit '{}' (run `thucdon units` to list them)", symbol))
    }

    pub fn symbol(&self, id: UnitId) -> String {
        self.by_id
            .get(&id)
            .map(|u| u.symbol.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thucdon_core::MemoryStore;

    async fn seeded_table() -> UnitTable {
        let store = MemoryStore::from_catalog(unit_catalog::catalog()).unwrap();
        UnitTable::load(&store).await.unwrap()
    }

    #[tokio::test]
    async fn test_resolve_by_symbol_and_name() {
        let table = seeded_table().await;

        assert_eq!(table.resolve("thìa").unwrap().name_en, "tablespoon");
        assert_eq!(table.resolve("Tablespoons").unwrap().symbol, "thìa");
        assert_eq!(table.resolve(" KG ").unwrap().symbol, "kg");
        assert!(table.resolve("furlong").is_err());
    }

    #[tokio::test]
    async fn test_categories_list_base_first() {
        let table = seeded_table().await;

        assert_eq!(table.categories.len(), 3);
        for (_, units) in &table.categories {
            assert!(units[0].is_base_unit);
        }
        let g = table.resolve("g").unwrap().id;
        assert_eq!(table.symbol(g), "g");
    }
}

use crate::amount::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_type!(
    /// Identifier of a measurement unit.
    UnitId
);
id_type!(
    /// Identifier of a unit category.
    CategoryId
);
id_type!(
    /// Identifier of an ingredient (owned by the surrounding application).
    IngredientId
);

/// What a category measures, derived from its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Mass,
    Volume,
    Count,
    Other(String),
}

impl CategoryKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "mass" => CategoryKind::Mass,
            "volume" => CategoryKind::Volume,
            "count" => CategoryKind::Count,
            other => CategoryKind::Other(other.to_string()),
        }
    }

    /// Mass and volume can be measured out; count cannot.
    pub fn is_measurable(&self) -> bool {
        matches!(self, CategoryKind::Mass | CategoryKind::Volume)
    }
}

/// Groups units that convert through a shared base unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCategory {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

impl UnitCategory {
    pub fn kind(&self) -> CategoryKind {
        CategoryKind::from_name(&self.name)
    }
}

/// A named measurement unit.
///
/// `quantity * factor_to_base` is the same quantity expressed in the
/// category's base unit. Exactly one unit per category is the base unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub symbol: String,
    pub name_vi: String,
    pub name_en: String,
    pub plural_vi: String,
    pub plural_en: String,
    pub category_id: CategoryId,
    pub is_base_unit: bool,
    pub factor_to_base: Amount,
}

/// An explicit `from -> to` factor that bypasses the base-unit path.
/// Directional: the inverse is a separate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectConversion {
    pub from_unit_id: UnitId,
    pub to_unit_id: UnitId,
    pub factor: Amount,
}

/// One `count_unit` of `ingredient_id` equals `quantity` of `measurable_unit_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientUnitMapping {
    pub ingredient_id: IngredientId,
    pub count_unit_id: UnitId,
    pub measurable_unit_id: UnitId,
    pub quantity: Amount,
    pub updated_at: DateTime<Utc>,
}

impl IngredientUnitMapping {
    pub fn new(
        ingredient_id: IngredientId,
        count_unit_id: UnitId,
        measurable_unit_id: UnitId,
        quantity: Amount,
    ) -> Self {
        Self {
            ingredient_id,
            count_unit_id,
            measurable_unit_id,
            quantity,
            updated_at: Utc::now(),
        }
    }

    pub fn details(&self) -> MappingDetails {
        MappingDetails {
            original_unit: self.count_unit_id,
            mapped_unit: self.measurable_unit_id,
            mapping_quantity: self.quantity,
        }
    }
}

/// One item of a bulk mapping write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRequest {
    pub ingredient_id: IngredientId,
    pub count_unit_id: UnitId,
    pub measurable_unit_id: UnitId,
    pub quantity: Amount,
}

/// Which ingredient mapping a conversion went through, for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDetails {
    pub original_unit: UnitId,
    pub mapped_unit: UnitId,
    pub mapping_quantity: Amount,
}

use crate::types::{CategoryId, IngredientId, UnitId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a [`UnitStore`](crate::store::UnitStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Conflicting write: {0}")]
    Conflict(String),
}

/// Why a conversion or mapping operation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Unit category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("Anchor unit '{symbol}' not found in store")]
    AnchorUnitMissing { symbol: String },

    #[error("Cannot convert between different categories: {from} and {to}")]
    CategoryMismatch { from: String, to: String },

    #[error("Density conversion only works between mass and volume units (got {from} -> {to})")]
    InvalidDensityPair { from: String, to: String },

    #[error("Density must be strictly positive, got {0}")]
    InvalidDensity(String),

    #[error("Quantity must not be negative, got {0}")]
    InvalidQuantity(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No mapping for ingredient {ingredient_id} and unit {count_unit_id}")]
    MappingNotFound {
        ingredient_id: IngredientId,
        count_unit_id: UnitId,
    },

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    CategoryMismatch,
    InvalidDensityPair,
    Validation,
    Arithmetic,
    Conflict,
    Store,
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::UnitNotFound(_)
            | ConversionError::CategoryNotFound(_)
            | ConversionError::AnchorUnitMissing { .. }
            | ConversionError::MappingNotFound { .. } => ErrorKind::NotFound,
            ConversionError::CategoryMismatch { .. } => ErrorKind::CategoryMismatch,
            ConversionError::InvalidDensityPair { .. } => ErrorKind::InvalidDensityPair,
            ConversionError::InvalidDensity(_)
            | ConversionError::InvalidQuantity(_)
            | ConversionError::Validation(_) => ErrorKind::Validation,
            ConversionError::Arithmetic(_) => ErrorKind::Arithmetic,
            ConversionError::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            ConversionError::Store(StoreError::Conflict(_)) => ErrorKind::Conflict,
            ConversionError::Store(_) => ErrorKind::Store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_message_preserved() {
        let err: ConversionError = StoreError::Unavailable("connection reset".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Store);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_kinds() {
        let mismatch = ConversionError::CategoryMismatch {
            from: "mass".to_string(),
            to: "volume".to_string(),
        };
        assert_eq!(mismatch.kind(), ErrorKind::CategoryMismatch);
        assert_eq!(
            mismatch.to_string(),
            "Cannot convert between different categories: mass and volume"
        );
        assert_eq!(
            ConversionError::UnitNotFound(UnitId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ConversionError::InvalidDensity("0".to_string()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ConversionError::from(StoreError::Conflict("kg -> g".to_string())).kind(),
            ErrorKind::Conflict
        );
    }
}

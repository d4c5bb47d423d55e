//! Conversion outcomes.

use crate::amount::Amount;
use crate::error::{ConversionError, ErrorKind};
use crate::types::{MappingDetails, UnitId};
use serde::{Deserialize, Serialize};

/// Which step of the escalation produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSource {
    Identity,
    Cached,
    DirectEdge,
    BasePath,
    Density,
    IngredientMapping,
}

/// A successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub value: Amount,
    /// Units traversed, for diagnostics.
    pub path: Vec<UnitId>,
    pub source: ConversionSource,
}

impl Converted {
    pub fn new(value: Amount, path: Vec<UnitId>, source: ConversionSource) -> Self {
        Self {
            value,
            path,
            source,
        }
    }
}

pub type ConversionResult = Result<Converted, ConversionError>;

/// Result of an ingredient-aware conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientConversion {
    pub converted: Converted,
    pub used_ingredient_mapping: bool,
    pub mapping_details: Option<MappingDetails>,
}

impl IngredientConversion {
    pub fn value(&self) -> Amount {
        self.converted.value
    }
}

/// Flat `{ success, converted_value?, error?, ... }` shape for JSON responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_value: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<UnitId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ConversionSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_ingredient_mapping: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_details: Option<MappingDetails>,
}

impl ConversionReport {
    fn failure(error: &ConversionError) -> Self {
        Self {
            success: false,
            converted_value: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            path: None,
            source: None,
            used_ingredient_mapping: None,
            mapping_details: None,
        }
    }

    fn success(converted: &Converted) -> Self {
        Self {
            success: true,
            converted_value: Some(converted.value),
            error: None,
            error_kind: None,
            path: Some(converted.path.clone()),
            source: Some(converted.source),
            used_ingredient_mapping: None,
            mapping_details: None,
        }
    }
}

impl From<&ConversionResult> for ConversionReport {
    fn from(result: &ConversionResult) -> Self {
        match result {
            Ok(converted) => Self::success(converted),
            Err(e) => Self::failure(e),
        }
    }
}

impl From<&Result<IngredientConversion, ConversionError>> for ConversionReport {
    fn from(result: &Result<IngredientConversion, ConversionError>) -> Self {
        match result {
            Ok(conversion) => Self {
                used_ingredient_mapping: Some(conversion.used_ingredient_mapping),
                mapping_details: conversion.mapping_details.clone(),
                ..Self::success(&conversion.converted)
            },
            Err(e) => Self {
                used_ingredient_mapping: Some(false),
                ..Self::failure(e)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_report_shape() {
        let from = UnitId::new();
        let to = UnitId::new();
        let result: ConversionResult = Ok(Converted::new(
            Amount::from(1000),
            vec![from, to],
            ConversionSource::BasePath,
        ));
        let json = serde_json::to_value(ConversionReport::from(&result)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["converted_value"], "1000");
        assert_eq!(json["source"], "base_path");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_report_shape() {
        let result: ConversionResult = Err(ConversionError::CategoryMismatch {
            from: "mass".to_string(),
            to: "volume".to_string(),
        });
        let json = serde_json::to_value(ConversionReport::from(&result)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error_kind"], "category_mismatch");
        assert!(json.get("converted_value").is_none());
    }

    #[test]
    fn test_ingredient_report_flags_mapping() {
        let result: Result<IngredientConversion, ConversionError> = Ok(IngredientConversion {
            converted: Converted::new(
                Amount::from(180),
                vec![UnitId::new(), UnitId::new()],
                ConversionSource::IngredientMapping,
            ),
            used_ingredient_mapping: true,
            mapping_details: None,
        });
        let report = ConversionReport::from(&result);
        assert_eq!(report.used_ingredient_mapping, Some(true));
        assert_eq!(report.converted_value, Some(Amount::from(180)));
    }
}

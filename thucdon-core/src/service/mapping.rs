use super::{store_failure, UnitConversionService};
use crate::amount::Amount;
use crate::error::{ConversionError, ErrorKind};
use crate::result::{ConversionSource, Converted, IngredientConversion};
use crate::types::{CategoryKind, IngredientId, IngredientUnitMapping, MappingRequest, UnitId};

/// Outcome of [`UnitConversionService::set_ingredient_mappings`].
#[derive(Debug, Default)]
pub struct BulkMappingOutcome {
    pub saved: Vec<IngredientUnitMapping>,
    pub failed: Vec<(MappingRequest, ConversionError)>,
}

impl UnitConversionService {
    /// Convert a quantity of a specific ingredient, going through its
    /// count-unit mapping (e.g. 1 quả trứng = 60 g) when one exists.
    ///
    /// Without a mapping, or if looking it up or applying it fails, this is
    /// plain [`convert`](Self::convert) with `used_ingredient_mapping = false`.
    pub async fn convert_with_ingredient_mapping(
        &self,
        quantity: Amount,
        from: UnitId,
        to: UnitId,
        ingredient: IngredientId,
    ) -> Result<IngredientConversion, ConversionError> {
        if from != to {
            if let Some(mapping) = self.lookup_mapping(ingredient, from).await {
                match self.apply_mapping(&mapping, quantity, to).await {
                    Ok(conversion) => return Ok(conversion),
                    Err(e) => tracing::warn!(
                        %ingredient,
                        error = %e,
                        "Ingredient mapping path failed, falling back to plain conversion"
                    ),
                }
            }
        }

        let converted = self.convert(quantity, from, to).await?;
        Ok(IngredientConversion {
            converted,
            used_ingredient_mapping: false,
            mapping_details: None,
        })
    }

    /// [`convert_with_ingredient_mapping`](Self::convert_with_ingredient_mapping),
    /// retried through the density bridge when the units are in different
    /// categories and the ingredient's density is known.
    ///
    /// The mapping, when one applies, always wins over the density.
    pub async fn convert_for_ingredient(
        &self,
        quantity: Amount,
        from: UnitId,
        to: UnitId,
        ingredient: IngredientId,
        density: Option<Amount>,
    ) -> Result<IngredientConversion, ConversionError> {
        let result = self
            .convert_with_ingredient_mapping(quantity, from, to, ingredient)
            .await;

        match (result, density) {
            (Err(e), Some(density)) if e.kind() == ErrorKind::CategoryMismatch => {
                tracing::debug!(%ingredient, "Falling back to density conversion");
                let converted = self.convert_with_density(quantity, from, to, density).await?;
                Ok(IngredientConversion {
                    converted,
                    used_ingredient_mapping: false,
                    mapping_details: None,
                })
            }
            (result, _) => result,
        }
    }

    /// Save several mappings, one at a time. A failing item does not stop
    /// the rest; each failure is returned with its request.
    pub async fn set_ingredient_mappings(
        &self,
        requests: Vec<MappingRequest>,
    ) -> BulkMappingOutcome {
        let mut outcome = BulkMappingOutcome::default();
        for request in requests {
            match self
                .set_ingredient_mapping(
                    request.ingredient_id,
                    request.count_unit_id,
                    request.measurable_unit_id,
                    request.quantity,
                )
                .await
            {
                Ok(mapping) => outcome.saved.push(mapping),
                Err(e) => outcome.failed.push((request, e)),
            }
        }

        tracing::info!(
            saved = outcome.saved.len(),
            failed = outcome.failed.len(),
            "Bulk ingredient mapping write finished"
        );
        outcome
    }

    /// Create or replace the mapping for `(ingredient, count_unit)`.
    ///
    /// `count_unit` must be in the count category and `measurable_unit` in
    /// mass or volume. Cached copies are evicted around the store write.
    pub async fn set_ingredient_mapping(
        &self,
        ingredient: IngredientId,
        count_unit: UnitId,
        measurable_unit: UnitId,
        quantity: Amount,
    ) -> Result<IngredientUnitMapping, ConversionError> {
        if !quantity.is_positive() {
            return Err(ConversionError::Validation(format!(
                "Mapping quantity must be positive, got {}",
                quantity
            )));
        }

        let count = self.require_unit(count_unit).await?;
        if self.category_of(&count).await?.kind() != CategoryKind::Count {
            return Err(ConversionError::Validation(
                "Count unit must be from the count category".to_string(),
            ));
        }

        let measurable = self.require_unit(measurable_unit).await?;
        if !self.category_of(&measurable).await?.kind().is_measurable() {
            return Err(ConversionError::Validation(
                "Measurable unit must be from the mass or volume category".to_string(),
            ));
        }

        self.mappings.evict(ingredient, count_unit);
        let stored = self
            .store
            .upsert_ingredient_mapping(IngredientUnitMapping::new(
                ingredient,
                count_unit,
                measurable_unit,
                quantity,
            ))
            .await
            .map_err(|e| store_failure("upsert_ingredient_mapping", e))?;
        self.mappings.evict(ingredient, count_unit);

        tracing::info!(
            %ingredient,
            count_unit = %count.symbol,
            measurable_unit = %measurable.symbol,
            %quantity,
            "Ingredient mapping saved"
        );
        Ok(stored)
    }

    /// Remove the mapping for `(ingredient, count_unit)`.
    pub async fn delete_ingredient_mapping(
        &self,
        ingredient: IngredientId,
        count_unit: UnitId,
    ) -> Result<IngredientUnitMapping, ConversionError> {
        self.mappings.evict(ingredient, count_unit);
        let deleted = self
            .store
            .delete_ingredient_mapping(ingredient, count_unit)
            .await
            .map_err(|e| store_failure("delete_ingredient_mapping", e))?;
        self.mappings.evict(ingredient, count_unit);

        match deleted {
            Some(mapping) => {
                tracing::info!(%ingredient, %count_unit, "Ingredient mapping deleted");
                Ok(mapping)
            }
            None => Err(ConversionError::MappingNotFound {
                ingredient_id: ingredient,
                count_unit_id: count_unit,
            }),
        }
    }

    /// All mappings stored for an ingredient. Always read from the store.
    pub async fn ingredient_mappings(
        &self,
        ingredient: IngredientId,
    ) -> Result<Vec<IngredientUnitMapping>, ConversionError> {
        self.store
            .list_ingredient_mappings(ingredient)
            .await
            .map_err(|e| store_failure("list_ingredient_mappings", e))
    }

    /// Cached mapping lookup. A store failure counts as "no mapping".
    async fn lookup_mapping(
        &self,
        ingredient: IngredientId,
        count_unit: UnitId,
    ) -> Option<IngredientUnitMapping> {
        if let Some(mapping) = self.mappings.get(ingredient, count_unit) {
            tracing::debug!(%ingredient, %count_unit, "Ingredient mapping cache hit");
            return Some(mapping);
        }

        match self.store.find_ingredient_mapping(ingredient, count_unit).await {
            Ok(Some(mapping)) => {
                self.mappings.insert(mapping.clone());
                Some(mapping)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(
                    %ingredient,
                    %count_unit,
                    error = %e,
                    "Ingredient mapping lookup failed, falling back to plain conversion"
                );
                None
            }
        }
    }

    async fn apply_mapping(
        &self,
        mapping: &IngredientUnitMapping,
        quantity: Amount,
        to: UnitId,
    ) -> Result<IngredientConversion, ConversionError> {
        if quantity.is_negative() {
            return Err(ConversionError::InvalidQuantity(quantity.to_string()));
        }

        let measured = quantity.checked_mul(mapping.quantity)?;
        let from = mapping.count_unit_id;

        let converted = if mapping.measurable_unit_id == to {
            Converted::new(measured, vec![from, to], ConversionSource::IngredientMapping)
        } else {
            let onward = self.convert(measured, mapping.measurable_unit_id, to).await?;
            let mut path = Vec::with_capacity(onward.path.len() + 1);
            path.push(from);
            path.extend(onward.path);
            Converted::new(onward.value, path, ConversionSource::IngredientMapping)
        };

        tracing::debug!(
            ingredient = %mapping.ingredient_id,
            %quantity,
            value = %converted.value,
            "Converted through ingredient mapping"
        );

        Ok(IngredientConversion {
            converted,
            used_ingredient_mapping: true,
            mapping_details: Some(mapping.details()),
        })
    }
}

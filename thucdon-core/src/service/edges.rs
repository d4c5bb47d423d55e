use super::{store_failure, UnitConversionService};
use crate::amount::Amount;
use crate::error::ConversionError;
use crate::types::{DirectConversion, UnitId};

impl UnitConversionService {
    /// Add a curated `from -> to` edge together with its `to -> from` inverse.
    ///
    /// Both units must share a category and `factor` must be positive. If
    /// either direction already has an edge nothing is written and the store's
    /// `Conflict` comes back. Cached ratios for the pair are evicted.
    pub async fn create_direct_conversion(
        &self,
        from: UnitId,
        to: UnitId,
        factor: Amount,
    ) -> Result<DirectConversion, ConversionError> {
        if !factor.is_positive() {
            return Err(ConversionError::Validation(format!(
                "Conversion factor must be positive, got {}",
                factor
            )));
        }
        if from == to {
            return Err(ConversionError::Validation(
                "Conversion needs two different units".to_string(),
            ));
        }

        let from_unit = self.require_unit(from).await?;
        let to_unit = self.require_unit(to).await?;
        if from_unit.category_id != to_unit.category_id {
            return Err(ConversionError::CategoryMismatch {
                from: self.category_of(&from_unit).await?.name,
                to: self.category_of(&to_unit).await?.name,
            });
        }

        let edge = DirectConversion {
            from_unit_id: from,
            to_unit_id: to,
            factor,
        };
        let inverse = DirectConversion {
            from_unit_id: to,
            to_unit_id: from,
            factor: Amount::ONE.checked_div(factor)?,
        };

        self.store
            .insert_direct_conversions(vec![edge.clone(), inverse])
            .await
            .map_err(|e| store_failure("insert_direct_conversions", e))?;
        self.factors.evict_pair(from, to);

        tracing::info!(
            from = %from_unit.symbol,
            to = %to_unit.symbol,
            %factor,
            "Direct conversion created"
        );
        Ok(edge)
    }
}

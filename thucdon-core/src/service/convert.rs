use super::{store_failure, UnitConversionService};
use crate::amount::Amount;
use crate::cache::Ratio;
use crate::error::ConversionError;
use crate::result::{ConversionResult, ConversionSource, Converted};
use crate::types::UnitId;

impl UnitConversionService {
    /// Convert `quantity` from one unit to another within a category.
    ///
    /// Tries, in order: identity, the factor cache, a direct conversion edge,
    /// and the path through the category's base unit. Units in different
    /// categories fail with [`ConversionError::CategoryMismatch`]; use
    /// [`convert_with_density`](Self::convert_with_density) for mass/volume.
    pub async fn convert(&self, quantity: Amount, from: UnitId, to: UnitId) -> ConversionResult {
        if quantity.is_negative() {
            return Err(ConversionError::InvalidQuantity(quantity.to_string()));
        }

        if from == to {
            return Ok(Converted::new(quantity, vec![from], ConversionSource::Identity));
        }

        if let Some(ratio) = self.factors.get(from, to) {
            tracing::debug!(%from, %to, %ratio, "Conversion cache hit");
            let value = ratio.apply(quantity)?;
            return Ok(Converted::new(value, vec![from, to], ConversionSource::Cached));
        }

        let edge = self
            .store
            .find_direct_conversion(from, to)
            .await
            .map_err(|e| store_failure("find_direct_conversion", e))?;

        match edge {
            Some(edge) if edge.factor.is_positive() => {
                tracing::debug!(%from, %to, factor = %edge.factor, "Using direct conversion edge");
                let ratio = Ratio::from(edge.factor);
                self.factors.insert(from, to, ratio);
                let value = ratio.apply(quantity)?;
                return Ok(Converted::new(value, vec![from, to], ConversionSource::DirectEdge));
            }
            Some(edge) => {
                tracing::warn!(%from, %to, factor = %edge.factor, "Ignoring non-positive direct conversion edge");
            }
            None => {}
        }

        self.convert_through_base(quantity, from, to).await
    }

    /// Convert via the base unit of the shared category.
    async fn convert_through_base(
        &self,
        quantity: Amount,
        from: UnitId,
        to: UnitId,
    ) -> ConversionResult {
        let from_unit = self.require_unit(from).await?;
        let to_unit = self.require_unit(to).await?;

        if from_unit.category_id != to_unit.category_id {
            let from_category = self.category_of(&from_unit).await?;
            let to_category = self.category_of(&to_unit).await?;
            return Err(ConversionError::CategoryMismatch {
                from: from_category.name,
                to: to_category.name,
            });
        }

        // quantity * numerator / denominator is the target quantity
        let (ratio, path) = if from_unit.is_base_unit {
            (Ratio::new(Amount::ONE, to_unit.factor_to_base), vec![from, to])
        } else if to_unit.is_base_unit {
            (Ratio::from(from_unit.factor_to_base), vec![from, to])
        } else {
            let base = self
                .store
                .find_base_unit(from_unit.category_id)
                .await
                .map_err(|e| store_failure("find_base_unit", e))?;
            let path = match base {
                Some(base) => vec![from, base.id, to],
                None => vec![from, to],
            };
            (
                Ratio::new(from_unit.factor_to_base, to_unit.factor_to_base),
                path,
            )
        };
        let value = ratio.apply(quantity)?;

        tracing::debug!(
            from = %from_unit.symbol,
            to = %to_unit.symbol,
            %ratio,
            "Converted through base unit"
        );
        self.factors.insert(from, to, ratio);

        Ok(Converted::new(value, path, ConversionSource::BasePath))
    }
}

use super::{store_failure, UnitConversionService};
use crate::amount::Amount;
use crate::error::ConversionError;
use crate::result::{ConversionResult, ConversionSource, Converted};
use crate::types::{CategoryKind, Unit, UnitId};

impl UnitConversionService {
    /// Convert between a mass unit and a volume unit using a density in g/mL.
    ///
    /// The quantity is first normalized to the mass anchor (g) or volume
    /// anchor (ml) with [`convert`](Self::convert), bridged by the density,
    /// then expanded to the target unit with `convert` again. Any other pair
    /// of categories fails with [`ConversionError::InvalidDensityPair`].
    pub async fn convert_with_density(
        &self,
        quantity: Amount,
        from: UnitId,
        to: UnitId,
        density: Amount,
    ) -> ConversionResult {
        if !density.is_positive() {
            return Err(ConversionError::InvalidDensity(density.to_string()));
        }
        if quantity.is_negative() {
            return Err(ConversionError::InvalidQuantity(quantity.to_string()));
        }

        let from_unit = self.require_unit(from).await?;
        let to_unit = self.require_unit(to).await?;
        let from_category = self.category_of(&from_unit).await?;
        let to_category = self.category_of(&to_unit).await?;

        let (direction, mut path) = match (from_category.kind(), to_category.kind()) {
            (CategoryKind::Mass, CategoryKind::Volume) => (Direction::MassToVolume, vec![from]),
            (CategoryKind::Volume, CategoryKind::Mass) => (Direction::VolumeToMass, vec![from]),
            _ => {
                return Err(ConversionError::InvalidDensityPair {
                    from: from_category.name,
                    to: to_category.name,
                })
            }
        };

        let grams = self.anchor_unit(&self.config.mass_anchor).await?;
        let millilitres = self.anchor_unit(&self.config.volume_anchor).await?;

        let value = match direction {
            Direction::MassToVolume => {
                let in_grams = self.convert(quantity, from, grams.id).await?;
                let in_ml = in_grams.value.checked_div(density)?;
                let out = self.convert(in_ml, millilitres.id, to).await?;
                path.extend([grams.id, millilitres.id, to]);
                out.value
            }
            Direction::VolumeToMass => {
                let in_ml = self.convert(quantity, from, millilitres.id).await?;
                let in_grams = in_ml.value.checked_mul(density)?;
                let out = self.convert(in_grams, grams.id, to).await?;
                path.extend([millilitres.id, grams.id, to]);
                out.value
            }
        };
        path.dedup();

        tracing::debug!(
            from = %from_unit.symbol,
            to = %to_unit.symbol,
            %density,
            %value,
            "Converted with density"
        );

        Ok(Converted::new(value, path, ConversionSource::Density))
    }

    /// Plain [`convert`](Self::convert), retried through the density bridge
    /// when the units are in different categories and a density is known.
    ///
    /// Callers that hold an ingredient's optional density use this instead of
    /// orchestrating the two calls themselves.
    pub async fn convert_with_density_fallback(
        &self,
        quantity: Amount,
        from: UnitId,
        to: UnitId,
        density: Option<Amount>,
    ) -> ConversionResult {
        match (self.convert(quantity, from, to).await, density) {
            (Err(ConversionError::CategoryMismatch { from: a, to: b }), Some(density)) => {
                tracing::debug!(from_category = %a, to_category = %b, "Falling back to density conversion");
                self.convert_with_density(quantity, from, to, density).await
            }
            (result, _) => result,
        }
    }

    async fn anchor_unit(&self, symbol: &str) -> Result<Unit, ConversionError> {
        self.store
            .find_unit_by_symbol(symbol)
            .await
            .map_err(|e| store_failure("find_unit_by_symbol", e))?
            .ok_or_else(|| ConversionError::AnchorUnitMissing {
                symbol: symbol.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    MassToVolume,
    VolumeToMass,
}

use crate::unit_table::UnitTable;
use anyhow::Result;
use thucdon_core::{
    Amount, ConversionError, ConversionReport, ConversionResult, IngredientConversion, UnitId,
};

/// Decimal places shown in human-readable output.
const DISPLAY_DP: u32 = 4;

pub fn print_json(report: &ConversionReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub fn print_conversion(
    units: &UnitTable,
    quantity: Amount,
    from: UnitId,
    to: UnitId,
    result: &ConversionResult,
) {
    match result {
        Ok(converted) => {
            println!(
                "{} {} = {} {}",
                quantity,
                units.symbol(from),
                converted.value.round_dp(DISPLAY_DP),
                units.symbol(to)
            );
            println!("  via {}", format_path(units, &converted.path));
        }
        Err(e) => print_error(e),
    }
}

pub fn print_ingredient_conversion(
    units: &UnitTable,
    ingredient: &str,
    quantity: Amount,
    from: UnitId,
    to: UnitId,
    result: &Result<IngredientConversion, ConversionError>,
) {
    match result {
        Ok(conversion) => {
            println!(
                "{} {} {} = {} {}",
                quantity,
                units.symbol(from),
                ingredient,
                conversion.value().round_dp(DISPLAY_DP),
                units.symbol(to)
            );
            if let Some(details) = &conversion.mapping_details {
                println!(
                    "  using 1 {} = {} {}",
                    units.symbol(details.original_unit),
                    details.mapping_quantity,
                    units.symbol(details.mapped_unit)
                );
            }
            println!("  via {}", format_path(units, &conversion.converted.path));
        }
        Err(e) => print_error(e),
    }
}

fn print_error(error: &ConversionError) {
    eprintln!("Conversion failed: {}", error);
}

fn format_path(units: &UnitTable, path: &[UnitId]) -> String {
    path.iter()
        .map(|id| units.symbol(*id))
        .collect::<Vec<_>>()
        .join(" -> ")
}

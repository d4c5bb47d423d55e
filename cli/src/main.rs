mod output;
mod unit_table;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use thucdon_core::{
    Amount, ConversionConfig, ConversionReport, IngredientId, MemoryStore, UnitConversionService,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use unit_table::UnitTable;

#[derive(Parser)]
#[command(name = "thucdon")]
#[command(about = "Convert recipe quantities between units", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List units by category
    Units,
    /// Convert a quantity between two units
    Convert {
        quantity: Amount,
        /// Source unit symbol (e.g. "g", "thìa")
        from: String,
        /// Target unit symbol
        to: String,
        /// Density in g/mL, for converting between mass and volume
        #[arg(long)]
        density: Option<Amount>,
    },
    /// Convert a quantity of a reference ingredient, using its count mappings
    /// and density when it has them
    Ingredient {
        /// Ingredient name (Vietnamese, English, or alias)
        name: String,
        quantity: Amount,
        from: String,
        to: String,
    },
    /// List units a unit can be converted to without a density
    Compatible { unit: String },
    /// Show the count mappings of a reference ingredient
    Mappings { name: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ConversionConfig::from_env().context("Failed to load conversion config")?;
    let store = Arc::new(
        MemoryStore::from_catalog(unit_catalog::catalog()).context("Failed to seed unit store")?,
    );
    let units = UnitTable::load(store.as_ref()).await?;
    let service = UnitConversionService::with_config(store.clone(), config);

    let ok = match cli.command {
        Commands::Units => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&units.categories)?);
            } else {
                list_units(&units);
            }
            true
        }
        Commands::Convert {
            quantity,
            from,
            to,
            density,
        } => {
            let from = units.resolve(&from)?.id;
            let to = units.resolve(&to)?.id;
            let result = match density {
                Some(density) => service.convert_with_density(quantity, from, to, density).await,
                None => service.convert(quantity, from, to).await,
            };

            if cli.json {
                output::print_json(&ConversionReport::from(&result))?;
            } else {
                output::print_conversion(&units, quantity, from, to, &result);
            }
            result.is_ok()
        }
        Commands::Ingredient {
            name,
            quantity,
            from,
            to,
        } => {
            let from = units.resolve(&from)?.id;
            let to = units.resolve(&to)?.id;

            let reference = unit_catalog::find_ingredient(&name);
            let ingredient = match reference.and_then(|r| store.seeded_ingredient(&r.name)) {
                Some(id) => id,
                None => {
                    tracing::warn!(ingredient = %name, "Not a reference ingredient, converting without mappings");
                    IngredientId::new()
                }
            };
            let density = reference.and_then(|r| r.density).map(Amount::new);

            let result = service
                .convert_for_ingredient(quantity, from, to, ingredient, density)
                .await;

            let display_name = reference.map_or(name.as_str(), |r| r.name.as_str());
            if cli.json {
                output::print_json(&ConversionReport::from(&result))?;
            } else {
                output::print_ingredient_conversion(
                    &units,
                    display_name,
                    quantity,
                    from,
                    to,
                    &result,
                );
            }
            result.is_ok()
        }
        Commands::Compatible { unit } => {
            let unit = units.resolve(&unit)?;
            let compatible = service.compatible_units(unit.id).await?;
            let symbols: Vec<String> = compatible.into_iter().map(|id| units.symbol(id)).collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&symbols)?);
            } else {
                println!("{}", symbols.join(", "));
            }
            true
        }
        Commands::Mappings { name } => {
            let reference = unit_catalog::find_ingredient(&name)
                .with_context(|| format!("Unknown ingredient '{}'", name))?;
            let ingredient = store
                .seeded_ingredient(&reference.name)
                .with_context(|| format!("Ingredient '{}' was not seeded", reference.name))?;
            let mappings = service.ingredient_mappings(ingredient).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&mappings)?);
            } else if mappings.is_empty() {
                println!("{} has no count mappings", reference.name);
            } else {
                for mapping in &mappings {
                    println!(
                        "1 {} {} = {} {}",
                        units.symbol(mapping.count_unit_id),
                        reference.name,
                        mapping.quantity,
                        units.symbol(mapping.measurable_unit_id)
                    );
                }
            }
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn list_units(units: &UnitTable) {
    for (category, members) in &units.categories {
        match &category.description {
            Some(description) => println!("{} ({})", category.name, description),
            None => println!("{}", category.name),
        }
        for unit in members {
            let marker = if unit.is_base_unit { " [base]" } else { "" };
            println!(
                "  {:<10} {} / {}  x{}{}",
                unit.symbol, unit.name_vi, unit.name_en, unit.factor_to_base, marker
            );
        }
    }
}

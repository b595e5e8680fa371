mod export;
mod prompt;

use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cocktail_core::{LookupClient, ReqwestClient};
use tracing_subscriber::EnvFilter;

use crate::export::ExportArgs;

#[derive(Parser)]
#[command(name = "cocktail")]
#[command(about = "Look up cocktail recipes and export them to a spreadsheet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one drink by name and print its recipe
    Lookup {
        /// Drink name (prompted for when omitted)
        #[arg(long)]
        name: Option<String>,
        /// Print the recipe as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recipes of drinks that use an ingredient
    ByIngredient {
        /// Ingredient name (prompted for when omitted)
        #[arg(long)]
        ingredient: Option<String>,
        /// Maximum number of drinks (default: 5)
        #[arg(long, default_value = "5")]
        limit: NonZeroUsize,
        /// Print the recipes as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Export recipes and an ingredient index to a spreadsheet
    Export {
        /// Target spreadsheet (falls back to COCKTAIL_SPREADSHEET_ID, then a prompt)
        #[arg(long)]
        spreadsheet_id: Option<String>,
        /// Drink to export (repeatable; default: the built-in list)
        #[arg(long = "drink")]
        drinks: Vec<String>,
        /// Ingredient for the index sheet (repeatable; default: the built-in list)
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        /// Drinks listed per ingredient (overrides COCKTAIL_INDEX_LIMIT)
        #[arg(long)]
        limit: Option<NonZeroUsize>,
        /// Skip the Ingredients and Instructions sheets
        #[arg(long)]
        skip_recipes: bool,
        /// Skip the Ingredient to Drink sheet
        #[arg(long)]
        skip_index: bool,
        /// Write to an in-memory workbook and print it instead
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = ReqwestClient::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let lookup = LookupClient::from_env(client);

    match cli.command {
        Commands::Lookup { name, json } => {
            let name = prompt::or_ask(name, "Drink name")?;
            let recipe = lookup.lookup_by_name(&name).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&recipe)?);
            } else {
                print!("{}", recipe);
            }
        }
        Commands::ByIngredient {
            ingredient,
            limit,
            json,
        } => {
            let ingredient = prompt::or_ask(ingredient, "Ingredient")?;
            let recipes = lookup.lookup_by_ingredient(&ingredient, limit).await?;
            tracing::debug!(
                ingredient = %ingredient,
                found = recipes.len(),
                "ingredient lookup done"
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&recipes)?);
                return Ok(());
            }
            for (i, recipe) in recipes.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", recipe);
            }
        }
        Commands::Export {
            spreadsheet_id,
            drinks,
            ingredients,
            limit,
            skip_recipes,
            skip_index,
            dry_run,
        } => {
            export::run(
                &lookup,
                ExportArgs {
                    spreadsheet_id,
                    drinks,
                    ingredients,
                    limit,
                    skip_recipes,
                    skip_index,
                    dry_run,
                },
            )
            .await?;
        }
    }

    Ok(())
}

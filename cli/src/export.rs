use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use cocktail_core::export::{DEFAULT_DRINKS, DEFAULT_INGREDIENTS};
use cocktail_core::{
    prepare_workbook, ExportConfig, ExportReport, Exporter, HttpClient, LookupClient,
    MemoryWorkbook, SheetCursors, SheetsConfig, SheetsWorkbook, Workbook,
};

use crate::prompt;

pub struct ExportArgs {
    pub spreadsheet_id: Option<String>,
    pub drinks: Vec<String>,
    pub ingredients: Vec<String>,
    pub limit: Option<NonZeroUsize>,
    pub skip_recipes: bool,
    pub skip_index: bool,
    pub dry_run: bool,
}

pub async fn run<C: HttpClient>(lookup: &LookupClient<C>, args: ExportArgs) -> Result<()> {
    let mut config = ExportConfig::from_env().context("Invalid export configuration")?;
    if let Some(limit) = args.limit {
        config.index_limit = limit;
    }

    if args.dry_run {
        let workbook = MemoryWorkbook::new();
        export_to(&workbook, lookup, config, &args).await?;
        for title in workbook.titles() {
            if let Some(sheet) = workbook.sheet(&title) {
                println!("== {} ==", title);
                print!("{}", sheet);
                println!();
            }
        }
        return Ok(());
    }

    let sheets = SheetsConfig::from_env().context("Google Sheets is not configured")?;
    let spreadsheet_id = prompt::or_ask(
        args.spreadsheet_id.clone().or_else(|| sheets.spreadsheet_id.clone()),
        "Spreadsheet ID",
    )?;
    let workbook = SheetsWorkbook::new(&sheets, &spreadsheet_id)
        .context("Failed to build Sheets client")?;
    export_to(&workbook, lookup, config, &args).await
}

async fn export_to<W, C>(
    workbook: &W,
    lookup: &LookupClient<C>,
    config: ExportConfig,
    args: &ExportArgs,
) -> Result<()>
where
    W: Workbook,
    C: HttpClient,
{
    let sheets = prepare_workbook(workbook)
        .await
        .context("Failed to prepare workbook")?;
    let exporter = Exporter::new(lookup, config);
    let mut cursors = SheetCursors::for_layout(&exporter.config().layout);

    if !args.skip_recipes {
        let drinks = or_defaults(&args.drinks, DEFAULT_DRINKS);
        let report = exporter
            .export_recipes(drinks, &sheets.ingredients, &sheets.instructions, &mut cursors)
            .await;
        print_report("Recipes", &report);
    }

    if !args.skip_index {
        let ingredients = or_defaults(&args.ingredients, DEFAULT_INGREDIENTS);
        let report = exporter
            .export_ingredient_index(ingredients, &sheets.index, &mut cursors)
            .await;
        print_report("Ingredient index", &report);
    }

    Ok(())
}

fn or_defaults(given: &[String], defaults: &[&str]) -> Vec<String> {
    if given.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        given.to_vec()
    }
}

fn print_report(label: &str, report: &ExportReport) {
    println!(
        "{}: {} written, {} skipped, {} rate-limit retries",
        label,
        report.written.len(),
        report.failures.len(),
        report.rate_limit_retries
    );
    for failure in &report.failures {
        println!("  {} ({:?}): {}", failure.item, failure.kind, failure.message);
    }
}

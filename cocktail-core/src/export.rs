//! Batch export of recipes into a workbook.
//!
//! Three sheets are written, each with its own cursor:
//! - `Ingredients`: recipe header, then ingredient/amount rows
//! - `Instructions`: recipe header, then one row per step
//! - `Ingredient to Drink`: ingredient header, then drink names
//!
//! The spreadsheet backend rate-limits writes. A rate-limited item is retried
//! after a fixed pause from the same cursors, so its block lands exactly where
//! the first attempt started and nothing is duplicated or skipped. Lookup
//! failures and other grid errors are recorded and the batch moves on.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::{ConfigError, ExportError, LookupError};
use crate::grid::{Grid, GridError, Workbook};
use crate::http::HttpClient;
use crate::layout::{find_next_writable_row, Layout};
use crate::lookup::LookupClient;
use crate::recipe::Recipe;

pub const INGREDIENTS_SHEET: &str = "Ingredients";
pub const INSTRUCTIONS_SHEET: &str = "Instructions";
pub const INDEX_SHEET: &str = "Ingredient to Drink";

pub const SHEET_ROWS: u32 = 100;
pub const SHEET_COLS: u32 = 100;

pub const DEFAULT_DRINKS: &[&str] = &[
    "Tom Collins",
    "Pina Colada",
    "Margarita",
    "Whiskey Sour",
    "Mojito",
    "Daiquiri",
    "Martini",
    "Old Fashioned",
    "White Russian",
    "Cuba Libre",
    "Long Island Iced Tea",
];

pub const DEFAULT_INGREDIENTS: &[&str] = &[
    "Gin",
    "Vodka",
    "Tequila",
    "Whiskey",
    "Rum",
    "Light rum",
    "Coffee liqueur",
    "Lemonade",
    "Scotch",
    "Tea",
    "Kahlua",
    "Everclear",
    "7-up",
];

/// Batch export settings.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Pause after a rate-limit signal before retrying the same item.
    pub backoff: Duration,
    /// Drinks listed per ingredient in the index sheet.
    pub index_limit: NonZeroUsize,
    pub layout: Layout,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(30),
            index_limit: NonZeroUsize::new(5).unwrap_or(NonZeroUsize::MIN),
            layout: Layout::default(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `COCKTAIL_BACKOFF_SECS`: rate-limit pause (default: 30)
    /// - `COCKTAIL_INDEX_LIMIT`: drinks per ingredient (default: 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("COCKTAIL_BACKOFF_SECS") {
            let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "COCKTAIL_BACKOFF_SECS".to_string(),
                value: value.clone(),
            })?;
            config.backoff = Duration::from_secs(secs);
        }

        if let Ok(value) = std::env::var("COCKTAIL_INDEX_LIMIT") {
            config.index_limit = value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "COCKTAIL_INDEX_LIMIT".to_string(),
                value: value.clone(),
            })?;
        }

        Ok(config)
    }
}

/// The three sheets an export writes to.
pub struct RecipeSheets<S> {
    pub ingredients: S,
    pub instructions: S,
    pub index: S,
}

/// Create the export sheets and their title rows.
pub async fn prepare_workbook<W: Workbook>(
    workbook: &W,
) -> Result<RecipeSheets<W::Sheet>, ExportError> {
    let ingredients =
        add_titled_sheet(workbook, INGREDIENTS_SHEET, &["Drink Name", "Ingredient", "Amount"])
            .await?;
    let instructions =
        add_titled_sheet(workbook, INSTRUCTIONS_SHEET, &["Drink Name", "Instruction"]).await?;
    let index = add_titled_sheet(workbook, INDEX_SHEET, &["Ingredient", "Drink Names"]).await?;

    Ok(RecipeSheets {
        ingredients,
        instructions,
        index,
    })
}

async fn add_titled_sheet<W: Workbook>(
    workbook: &W,
    title: &str,
    columns: &[&str],
) -> Result<W::Sheet, ExportError> {
    let prepare = |source: GridError| ExportError::PrepareSheet {
        sheet: title.to_string(),
        source,
    };
    let sheet = workbook
        .add_sheet(title, SHEET_ROWS, SHEET_COLS)
        .await
        .map_err(prepare)?;
    sheet.insert_header_row(columns).await.map_err(prepare)?;
    Ok(sheet)
}

/// Next free row of each export sheet.
///
/// `None` means the position is unknown, as on a resumed run against an
/// already populated workbook. The exporter scans for it once per item and
/// pins the result before writing, so retries start from the same row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetCursors {
    pub ingredients: Option<u32>,
    pub instructions: Option<u32>,
    pub index: Option<u32>,
}

impl SheetCursors {
    /// Cursors for freshly prepared sheets: the first record goes on row
    /// `reserved_rows`, which gets no separator.
    pub fn for_layout(layout: &Layout) -> Self {
        let first = Some(layout.reserved_rows.max(1));
        Self {
            ingredients: first,
            instructions: first,
            index: first,
        }
    }
}

/// Resolve an unset cursor by scanning the sheet, and keep the result.
async fn pin_cursor<G: Grid>(
    layout: &Layout,
    sheet: &G,
    cursor: &mut Option<u32>,
) -> Result<u32, GridError> {
    if let Some(row) = *cursor {
        return Ok(row);
    }
    let row = find_next_writable_row(sheet, &layout.scan).await?;
    tracing::debug!(row, "located next writable row");
    *cursor = Some(row);
    Ok(row)
}

/// How far a recipe write got before it stopped.
#[derive(Clone, Copy)]
enum RecipeStage {
    Locating,
    Ingredients,
    Instructions { ingredients_end: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Malformed,
    Transport,
    Grid,
}

impl From<&LookupError> for FailureKind {
    fn from(err: &LookupError) -> Self {
        match err {
            LookupError::NotFound { .. } => FailureKind::NotFound,
            LookupError::Malformed(_) => FailureKind::Malformed,
            LookupError::Transport(_) => FailureKind::Transport,
        }
    }
}

/// An item that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub item: String,
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Items written, in write order.
    pub written: Vec<String>,
    pub failures: Vec<ItemFailure>,
    pub rate_limit_retries: usize,
}

impl ExportReport {
    fn lookup_failed(&mut self, item: String, err: LookupError) {
        tracing::warn!(item = %item, error = %err, "skipping item");
        self.failures.push(ItemFailure {
            item,
            kind: FailureKind::from(&err),
            message: err.to_string(),
        });
    }

    fn grid_failed(&mut self, item: String, err: GridError) {
        tracing::warn!(item = %item, error = %err, "failed to write item");
        self.failures.push(ItemFailure {
            item,
            kind: FailureKind::Grid,
            message: err.to_string(),
        });
    }
}

/// A queued item and, after a first attempt, what its lookup returned.
struct Pending<T> {
    key: String,
    resolved: Option<T>,
}

fn queue<T>(keys: impl IntoIterator<Item = String>) -> VecDeque<Pending<T>> {
    keys.into_iter()
        .map(|key| Pending {
            key,
            resolved: None,
        })
        .collect()
}

/// Runs lookups and sheet writes one item at a time.
pub struct Exporter<'a, C> {
    lookup: &'a LookupClient<C>,
    config: ExportConfig,
}

impl<'a, C: HttpClient> Exporter<'a, C> {
    pub fn new(lookup: &'a LookupClient<C>, config: ExportConfig) -> Self {
        Self { lookup, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    async fn back_off(&self, item: &str, err: &GridError, report: &mut ExportReport) {
        report.rate_limit_retries += 1;
        tracing::warn!(
            item,
            error = %err,
            backoff_secs = self.config.backoff.as_secs(),
            "rate limited, waiting before retry"
        );
        tokio::time::sleep(self.config.backoff).await;
    }

    /// Write each drink's ingredient and instruction blocks.
    ///
    /// Both cursors move only once both blocks are written, so a retried drink
    /// overwrites its own partial rows instead of leaving a second copy. After
    /// a hard failure the rows already written stay; a finished ingredient
    /// block keeps its place and a partial block is stepped over by rescanning.
    pub async fn export_recipes<G: Grid>(
        &self,
        names: impl IntoIterator<Item = String>,
        ingredients_sheet: &G,
        instructions_sheet: &G,
        cursors: &mut SheetCursors,
    ) -> ExportReport {
        let layout = &self.config.layout;
        let mut pending = queue::<Recipe>(names);
        let mut report = ExportReport::default();

        while let Some(mut item) = pending.pop_front() {
            let recipe = match item.resolved.take() {
                Some(recipe) => recipe,
                None => match self.lookup.lookup_by_name(&item.key).await {
                    Ok(recipe) => recipe,
                    Err(e) => {
                        report.lookup_failed(item.key, e);
                        continue;
                    }
                },
            };

            let mut stage = RecipeStage::Locating;
            let written = async {
                let ingredients_start =
                    pin_cursor(layout, ingredients_sheet, &mut cursors.ingredients).await?;
                let instructions_start =
                    pin_cursor(layout, instructions_sheet, &mut cursors.instructions).await?;

                stage = RecipeStage::Ingredients;
                let ingredients_end = layout
                    .write_ingredient_block(ingredients_sheet, &recipe, Some(ingredients_start))
                    .await?;

                stage = RecipeStage::Instructions { ingredients_end };
                let instructions_end = layout
                    .write_instruction_block(
                        instructions_sheet,
                        &recipe,
                        Some(instructions_start),
                    )
                    .await?;
                Ok::<_, GridError>((ingredients_end, instructions_end))
            }
            .await;

            match written {
                Ok((ingredients, instructions)) => {
                    cursors.ingredients = Some(ingredients);
                    cursors.instructions = Some(instructions);
                    tracing::info!(
                        drink = %item.key,
                        ingredients,
                        instructions,
                        "wrote recipe"
                    );
                    report.written.push(item.key);
                }
                Err(e) if e.is_transient() => {
                    self.back_off(&item.key, &e, &mut report).await;
                    item.resolved = Some(recipe);
                    pending.push_front(item);
                }
                Err(e) => {
                    match stage {
                        RecipeStage::Locating => {}
                        RecipeStage::Ingredients => cursors.ingredients = None,
                        RecipeStage::Instructions { ingredients_end } => {
                            cursors.ingredients = Some(ingredients_end);
                            cursors.instructions = None;
                        }
                    }
                    report.grid_failed(item.key, e);
                }
            }
        }

        report
    }

    /// Write an ingredient header and matching drink names per ingredient.
    pub async fn export_ingredient_index<G: Grid>(
        &self,
        ingredients: impl IntoIterator<Item = String>,
        index_sheet: &G,
        cursors: &mut SheetCursors,
    ) -> ExportReport {
        let layout = &self.config.layout;
        let mut pending = queue::<Vec<Recipe>>(ingredients);
        let mut report = ExportReport::default();

        while let Some(mut item) = pending.pop_front() {
            let recipes = match item.resolved.take() {
                Some(recipes) => recipes,
                None => match self
                    .lookup
                    .lookup_by_ingredient(&item.key, self.config.index_limit)
                    .await
                {
                    Ok(recipes) => recipes,
                    Err(e) => {
                        report.lookup_failed(item.key, e);
                        continue;
                    }
                },
            };

            let start = match pin_cursor(layout, index_sheet, &mut cursors.index).await {
                Ok(start) => start,
                Err(e) if e.is_transient() => {
                    self.back_off(&item.key, &e, &mut report).await;
                    item.resolved = Some(recipes);
                    pending.push_front(item);
                    continue;
                }
                Err(e) => {
                    report.grid_failed(item.key, e);
                    continue;
                }
            };

            match layout
                .write_ingredient_index_block(index_sheet, &item.key, &recipes, Some(start))
                .await
            {
                Ok(next) => {
                    cursors.index = Some(next);
                    tracing::info!(
                        ingredient = %item.key,
                        drinks = recipes.len(),
                        next,
                        "wrote ingredient"
                    );
                    report.written.push(item.key);
                }
                Err(e) if e.is_transient() => {
                    self.back_off(&item.key, &e, &mut report).await;
                    item.resolved = Some(recipes);
                    pending.push_front(item);
                }
                Err(e) => {
                    cursors.index = None;
                    report.grid_failed(item.key, e);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{MemoryGrid, MemoryWorkbook};
    use crate::http::MockClient;
    use crate::test_support::drink_json;
    use serde_json::json;
    use std::sync::Arc;

    fn lookup() -> LookupClient<MockClient> {
        let urls = LookupClient::new(MockClient::new());
        let search = |name: &str| urls.search_url(name).unwrap();
        let filter = |name: &str| urls.filter_url(name).unwrap();

        let mock = MockClient::new()
            .with_json(
                &search("Mojito"),
                &json!({ "drinks": [drink_json(
                    "Mojito",
                    "Highball glass",
                    "Muddle mint. Add rum. Top with soda",
                    &[
                        ("Light rum", Some("2-3 oz")),
                        ("Lime", Some("Juice of 1")),
                        ("Soda water", None),
                    ],
                )] }),
            )
            .with_json(
                &search("Daiquiri"),
                &json!({ "drinks": [drink_json(
                    "Daiquiri",
                    "Cocktail glass",
                    "Shake with ice.\r\nStrain.\r\n",
                    &[("Light rum", Some("1 1/2 oz")), ("Lime", Some("Juice of 1/2"))],
                )] }),
            )
            .with_text(&search("Nope"), "{\"drinks\": null}")
            .with_json(
                &filter("Light rum"),
                &json!({ "drinks": [{ "strDrink": "Mojito" }, { "strDrink": "Daiquiri" }] }),
            )
            .with_text(&filter("Unobtainium"), "");

        LookupClient::new(mock)
    }

    fn config() -> ExportConfig {
        ExportConfig {
            backoff: Duration::ZERO,
            ..ExportConfig::default()
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    async fn run_recipes(
        ingredients: &MemoryGrid,
        instructions: &MemoryGrid,
        items: &[&str],
    ) -> (ExportReport, SheetCursors) {
        let lookup = lookup();
        let exporter = Exporter::new(&lookup, config());
        let mut cursors = SheetCursors::for_layout(&Layout::default());
        let report = exporter
            .export_recipes(names(items), ingredients, instructions, &mut cursors)
            .await;
        (report, cursors)
    }

    #[tokio::test]
    async fn writes_blocks_and_threads_cursors() {
        let ingredients = MemoryGrid::new(100, 100);
        let instructions = MemoryGrid::new(100, 100);

        let (report, cursors) =
            run_recipes(&ingredients, &instructions, &["Mojito", "Daiquiri"]).await;

        assert_eq!(report.written, names(&["Mojito", "Daiquiri"]));
        assert!(report.failures.is_empty());
        // Mojito: name at 2, 3 ingredients at 3-5. Daiquiri: separator 6, name 7, rows 8-9.
        assert_eq!(cursors.ingredients, Some(10));
        // Mojito: name at 2, 3 steps at 3-5. Daiquiri: separator 6, name 7, steps 8-9.
        assert_eq!(cursors.instructions, Some(10));
        assert_eq!(cursors.index, Some(2));

        assert_eq!(ingredients.value(5, 2), Some("Soda water".to_string()));
        assert_eq!(ingredients.value(5, 3), Some("To Taste".to_string()));
        assert_eq!(ingredients.value(6, 1), Some("0".to_string()));
        assert_eq!(instructions.value(9, 2), Some("Strain.".to_string()));
    }

    #[tokio::test]
    async fn rate_limited_write_is_retried_in_place() {
        let clean_ingredients = MemoryGrid::new(100, 100);
        let clean_instructions = MemoryGrid::new(100, 100);
        run_recipes(&clean_ingredients, &clean_instructions, &["Mojito", "Daiquiri"]).await;

        // Fail mid-block on the ingredients sheet, and on the instructions sheet
        // after Daiquiri's ingredients already went through.
        let ingredients = MemoryGrid::new(100, 100).with_rate_limited_writes([4]);
        let instructions = MemoryGrid::new(100, 100).with_rate_limited_writes([7]);
        let (report, cursors) =
            run_recipes(&ingredients, &instructions, &["Mojito", "Daiquiri"]).await;

        assert_eq!(report.rate_limit_retries, 2);
        assert_eq!(report.written, names(&["Mojito", "Daiquiri"]));
        assert_eq!(cursors.ingredients, Some(10));
        assert_eq!(cursors.instructions, Some(10));
        assert_eq!(ingredients.snapshot(), clean_ingredients.snapshot());
        assert_eq!(instructions.snapshot(), clean_instructions.snapshot());
    }

    #[tokio::test]
    async fn retry_does_not_repeat_lookup() {
        let lookup = lookup();
        let exporter = Exporter::new(&lookup, config());
        let ingredients = MemoryGrid::new(100, 100).with_rate_limited_writes([1, 2]);
        let instructions = MemoryGrid::new(100, 100);
        let mut cursors = SheetCursors::for_layout(&Layout::default());

        let report = exporter
            .export_recipes(names(&["Mojito"]), &ingredients, &instructions, &mut cursors)
            .await;

        assert_eq!(report.rate_limit_retries, 2);
        assert_eq!(lookup.client().requests().len(), 1);
    }

    #[tokio::test]
    async fn missing_drinks_are_skipped() {
        let ingredients = MemoryGrid::new(100, 100);
        let instructions = MemoryGrid::new(100, 100);

        let (report, cursors) =
            run_recipes(&ingredients, &instructions, &["Nope", "Mojito"]).await;

        assert_eq!(report.written, names(&["Mojito"]));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].item, "Nope");
        assert_eq!(report.failures[0].kind, FailureKind::NotFound);
        assert_eq!(cursors.ingredients, Some(6));
        assert_eq!(ingredients.value(2, 1), Some("Mojito".to_string()));
    }

    #[tokio::test]
    async fn full_sheet_is_reported_not_retried() {
        let ingredients = MemoryGrid::new(4, 3);
        let instructions = MemoryGrid::new(100, 100);

        let (report, cursors) = run_recipes(&ingredients, &instructions, &["Mojito"]).await;

        assert!(report.written.is_empty());
        assert_eq!(report.rate_limit_retries, 0);
        assert_eq!(report.failures[0].kind, FailureKind::Grid);
        // The partial ingredient block is rescanned past; instructions were never touched.
        assert_eq!(cursors.ingredients, None);
        assert_eq!(cursors.instructions, Some(2));
    }

    #[tokio::test]
    async fn unset_cursors_are_pinned_before_a_retry() {
        let workbook = MemoryWorkbook::new();
        let sheets = prepare_workbook(&workbook).await.unwrap();
        let clean = MemoryWorkbook::new();
        let clean_sheets = prepare_workbook(&clean).await.unwrap();

        let lookup = lookup();
        let exporter = Exporter::new(&lookup, config());
        let mut clean_cursors = SheetCursors::default();
        exporter
            .export_recipes(
                names(&["Mojito"]),
                &clean_sheets.ingredients,
                &clean_sheets.instructions,
                &mut clean_cursors,
            )
            .await;

        // Rate limit the second ingredient cell, after the header and one row went in.
        let ingredients =
            Arc::new(MemoryGrid::new(SHEET_ROWS, SHEET_COLS).with_rate_limited_writes([4]));
        ingredients
            .insert_header_row(&["Drink Name", "Ingredient", "Amount"])
            .await
            .unwrap();
        let mut cursors = SheetCursors::default();
        let report = exporter
            .export_recipes(
                names(&["Mojito"]),
                &ingredients,
                &sheets.instructions,
                &mut cursors,
            )
            .await;

        assert_eq!(report.rate_limit_retries, 1);
        assert_eq!(report.written, names(&["Mojito"]));
        assert_eq!(cursors, clean_cursors);
        assert_eq!(cursors.ingredients, Some(6));
        assert_eq!(ingredients.snapshot(), clean_sheets.ingredients.snapshot());

        let headers = ingredients
            .snapshot()
            .iter()
            .filter(|row| row.first().map(String::as_str) == Some("Mojito"))
            .count();
        assert_eq!(headers, 1);
    }

    #[tokio::test]
    async fn failed_instructions_keep_finished_ingredient_block() {
        let ingredients = MemoryGrid::new(100, 100);
        // Mojito's instruction header is write 1; its second step is write 3.
        let instructions = MemoryGrid::new(100, 100)
            .with_failed_writes([3], GridError::Backend("quota exceeded".to_string()));

        let (report, cursors) =
            run_recipes(&ingredients, &instructions, &["Mojito", "Daiquiri"]).await;

        assert_eq!(report.written, names(&["Daiquiri"]));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].item, "Mojito");
        assert_eq!(report.failures[0].kind, FailureKind::Grid);

        // Mojito's ingredients stay whole; Daiquiri follows below a separator.
        assert_eq!(ingredients.value(2, 1), Some("Mojito".to_string()));
        assert_eq!(ingredients.value(5, 2), Some("Soda water".to_string()));
        assert_eq!(ingredients.value(6, 1), Some("0".to_string()));
        assert_eq!(ingredients.value(7, 1), Some("Daiquiri".to_string()));
        assert_eq!(ingredients.value(8, 2), Some("Light rum".to_string()));

        // Daiquiri's instructions go below Mojito's partial rows instead of over them.
        assert_eq!(instructions.value(2, 1), Some("Mojito".to_string()));
        assert_eq!(instructions.value(3, 2), Some("Muddle mint".to_string()));
        assert_eq!(instructions.value(4, 1), Some("0".to_string()));
        assert_eq!(instructions.value(5, 1), Some("Daiquiri".to_string()));
        assert_eq!(instructions.value(6, 2), Some("Shake with ice.".to_string()));
        assert_eq!(instructions.value(7, 2), Some("Strain.".to_string()));

        assert_eq!(cursors.ingredients, Some(10));
        assert_eq!(cursors.instructions, Some(8));
    }

    #[tokio::test]
    async fn failed_index_block_is_stepped_over() {
        let lookup = lookup();
        let exporter = Exporter::new(&lookup, config());
        // Light rum header is write 1, its first drink name write 2.
        let index = MemoryGrid::new(100, 100)
            .with_failed_writes([2], GridError::Backend("quota exceeded".to_string()));
        let mut cursors = SheetCursors::for_layout(&exporter.config().layout);

        let report = exporter
            .export_ingredient_index(names(&["Light rum", "Light rum"]), &index, &mut cursors)
            .await;

        assert_eq!(report.written, names(&["Light rum"]));
        assert_eq!(report.failures[0].kind, FailureKind::Grid);
        // The partial block is row 2 alone; the rescan lands on row 3.
        assert_eq!(index.value(3, 1), Some("0".to_string()));
        assert_eq!(index.value(4, 1), Some("Light rum".to_string()));
        assert_eq!(index.value(5, 2), Some("Mojito".to_string()));
        assert_eq!(cursors.index, Some(7));
    }

    #[test]
    fn cursors_start_at_reserved_rows() {
        let layout = Layout {
            reserved_rows: 4,
            ..Layout::default()
        };
        assert_eq!(
            SheetCursors::for_layout(&layout),
            SheetCursors {
                ingredients: Some(4),
                instructions: Some(4),
                index: Some(4),
            }
        );
        assert_eq!(SheetCursors::for_layout(&Layout::default()).index, Some(2));
    }

    #[tokio::test]
    async fn ingredient_index_with_retry() {
        let lookup = lookup();
        let exporter = Exporter::new(&lookup, config());
        let index = MemoryGrid::new(100, 100).with_rate_limited_writes([2]);
        let mut cursors = SheetCursors::for_layout(&Layout::default());

        let report = exporter
            .export_ingredient_index(names(&["Unobtainium", "Light rum"]), &index, &mut cursors)
            .await;

        assert_eq!(report.written, names(&["Light rum"]));
        assert_eq!(report.failures[0].kind, FailureKind::NotFound);
        assert_eq!(report.rate_limit_retries, 1);
        assert_eq!(cursors.index, Some(5));
        assert_eq!(index.value(2, 1), Some("Light rum".to_string()));
        assert_eq!(index.value(3, 2), Some("Mojito".to_string()));
        assert_eq!(index.value(4, 2), Some("Daiquiri".to_string()));
    }

    #[tokio::test]
    async fn prepared_workbook_has_titled_sheets() {
        let workbook = MemoryWorkbook::new();
        let sheets = prepare_workbook(&workbook).await.unwrap();

        assert_eq!(
            workbook.titles(),
            names(&[INGREDIENTS_SHEET, INSTRUCTIONS_SHEET, INDEX_SHEET])
        );
        assert_eq!(
            sheets.ingredients.snapshot(),
            vec![names(&["Drink Name", "Ingredient", "Amount"])]
        );
        assert_eq!(sheets.index.value(1, 2), Some("Drink Names".to_string()));

        let err = prepare_workbook(&workbook).await.err().unwrap();
        assert!(matches!(
            err,
            ExportError::PrepareSheet { ref sheet, .. } if sheet == INGREDIENTS_SHEET
        ));
    }
}

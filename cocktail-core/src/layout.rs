//! Row layout for recipe sheets.
//!
//! Every entry is a block of rows:
//!
//! ```text
//! 0 | 0 | 0             <- separator (not in the reserved top rows)
//! Mojito                <- header, column 1
//!   | Light rum | 2 oz  <- detail rows, columns 2 and 3
//!   | Lime | Juice of 1
//! ```
//!
//! Each write takes the row to start at and returns the first row after what
//! it wrote. Callers keep one cursor per sheet and pass it back in; passing
//! `None` rediscovers the position by scanning, which costs a read per cell.

use crate::grid::{Grid, GridError};
use crate::recipe::Recipe;

pub const NAME_COL: u32 = 1;
pub const DETAIL_COL: u32 = 2;
pub const AMOUNT_COL: u32 = 3;

/// Parameters of [`find_next_writable_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Empty rows required directly below the returned row.
    pub min_trailing_empty_rows: u32,
    /// How many cells, from column 1, must be unset for a row to count as empty.
    pub min_leading_empty_cells: u32,
    pub start_row: u32,
    /// Last row the scan may inspect.
    pub max_row: u32,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            min_trailing_empty_rows: 1,
            min_leading_empty_cells: 3,
            start_row: 1,
            max_row: 10_000,
        }
    }
}

async fn is_row_empty<G: Grid + ?Sized>(
    grid: &G,
    row: u32,
    width: u32,
) -> Result<bool, GridError> {
    for col in 1..=width {
        if let Some(value) = grid.get_cell(row, col).await? {
            if !value.is_empty() {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// First empty row at or after `start_row` that has at least
/// `min_trailing_empty_rows` empty rows below it.
///
/// Fails with [`GridError::OutOfBounds`] when no such row exists up to
/// `max_row`, or when the grid itself runs out of rows first.
pub async fn find_next_writable_row<G: Grid + ?Sized>(
    grid: &G,
    options: &ScanOptions,
) -> Result<u32, GridError> {
    let width = options.min_leading_empty_cells;
    let mut row = options.start_row.max(1);

    while row <= options.max_row {
        if !is_row_empty(grid, row, width).await? {
            row += 1;
            continue;
        }

        let mut blocker = None;
        for below in row + 1..=row + options.min_trailing_empty_rows {
            if !is_row_empty(grid, below, width).await? {
                blocker = Some(below);
                break;
            }
        }

        match blocker {
            None => return Ok(row),
            // Every row up to the blocker has it inside its trailing window.
            Some(below) => row = below + 1,
        }
    }

    Err(GridError::OutOfBounds {
        row: options.max_row,
        col: NAME_COL,
    })
}

/// Fill the first `width` cells of `row` with `marker`.
pub async fn write_separator<G: Grid + ?Sized>(
    grid: &G,
    row: u32,
    width: u32,
    marker: &str,
) -> Result<(), GridError> {
    for col in 1..=width {
        grid.set_cell(row, col, marker).await?;
    }
    Ok(())
}

/// Sheet conventions shared by all block writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Rows `1..=reserved_rows` hold column titles and never get a separator.
    pub reserved_rows: u32,
    pub separator: String,
    /// Separator width above a recipe header.
    pub recipe_width: u32,
    /// Separator width above an ingredient header in the index sheet.
    pub index_width: u32,
    pub scan: ScanOptions,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            reserved_rows: 2,
            separator: "0".to_string(),
            recipe_width: 3,
            index_width: 2,
            scan: ScanOptions::default(),
        }
    }
}

impl Layout {
    async fn resolve_row<G: Grid + ?Sized>(
        &self,
        grid: &G,
        row: Option<u32>,
    ) -> Result<u32, GridError> {
        match row {
            Some(row) => Ok(row),
            None => find_next_writable_row(grid, &self.scan).await,
        }
    }

    async fn write_header<G: Grid + ?Sized>(
        &self,
        grid: &G,
        title: &str,
        width: u32,
        row: Option<u32>,
    ) -> Result<u32, GridError> {
        let mut row = self.resolve_row(grid, row).await?;
        if row > self.reserved_rows {
            write_separator(grid, row, width, &self.separator).await?;
            row += 1;
        }
        grid.set_cell(row, NAME_COL, title).await?;
        Ok(row + 1)
    }

    /// Separator (outside the reserved rows) and the recipe name.
    pub async fn write_record_header<G: Grid + ?Sized>(
        &self,
        grid: &G,
        recipe: &Recipe,
        row: Option<u32>,
    ) -> Result<u32, GridError> {
        self.write_header(grid, recipe.name(), self.recipe_width, row)
            .await
    }

    /// Recipe header, then one `ingredient | amount` row per ingredient.
    pub async fn write_ingredient_block<G: Grid + ?Sized>(
        &self,
        grid: &G,
        recipe: &Recipe,
        start: Option<u32>,
    ) -> Result<u32, GridError> {
        let mut row = self.write_record_header(grid, recipe, start).await?;
        for (ingredient, amount) in recipe.ingredients() {
            grid.set_cell(row, DETAIL_COL, ingredient).await?;
            grid.set_cell(row, AMOUNT_COL, amount).await?;
            row += 1;
        }
        Ok(row)
    }

    /// Recipe header, then one row per instruction step.
    pub async fn write_instruction_block<G: Grid + ?Sized>(
        &self,
        grid: &G,
        recipe: &Recipe,
        start: Option<u32>,
    ) -> Result<u32, GridError> {
        let mut row = self.write_record_header(grid, recipe, start).await?;
        for step in recipe.instructions() {
            grid.set_cell(row, DETAIL_COL, step).await?;
            row += 1;
        }
        Ok(row)
    }

    /// Ingredient header, then the name of each recipe using it.
    pub async fn write_ingredient_index_block<G: Grid + ?Sized>(
        &self,
        grid: &G,
        ingredient: &str,
        recipes: &[Recipe],
        start: Option<u32>,
    ) -> Result<u32, GridError> {
        let mut row = self
            .write_header(grid, ingredient, self.index_width, start)
            .await?;
        for recipe in recipes {
            grid.set_cell(row, DETAIL_COL, recipe.name()).await?;
            row += 1;
        }
        Ok(row)
    }
}

//! In-memory grid, used for dry runs and tests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{Grid, GridError, Workbook};

struct State {
    rows: u32,
    cells: BTreeMap<(u32, u32), String>,
    /// Number of `set_cell` calls seen so far, failed ones included.
    write_attempts: usize,
    /// 1-based write attempts that fail, and the error they fail with.
    failed_writes: BTreeMap<usize, GridError>,
}

/// A fixed-capacity sheet held in memory.
pub struct MemoryGrid {
    cols: u32,
    state: Mutex<State>,
}

impl MemoryGrid {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            cols,
            state: Mutex::new(State {
                rows,
                cells: BTreeMap::new(),
                write_attempts: 0,
                failed_writes: BTreeMap::new(),
            }),
        }
    }

    /// Make the given write attempts (1-based, counted from creation) fail
    /// with [`GridError::RateLimited`] without touching the cell.
    pub fn with_rate_limited_writes(self, attempts: impl IntoIterator<Item = usize>) -> Self {
        self.with_failed_writes(attempts, GridError::RateLimited)
    }

    /// Make the given write attempts fail with `error` without touching the cell.
    pub fn with_failed_writes(
        self,
        attempts: impl IntoIterator<Item = usize>,
        error: GridError,
    ) -> Self {
        self.state()
            .failed_writes
            .extend(attempts.into_iter().map(|attempt| (attempt, error.clone())));
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_bounds(&self, rows: u32, row: u32, col: u32) -> Result<(), GridError> {
        if row == 0 || col == 0 || row > rows || col > self.cols {
            return Err(GridError::OutOfBounds { row, col });
        }
        Ok(())
    }

    pub fn row_count(&self) -> u32 {
        self.state().rows
    }

    pub fn col_count(&self) -> u32 {
        self.cols
    }

    pub fn write_attempts(&self) -> usize {
        self.state().write_attempts
    }

    /// Current value of a cell, bypassing bounds checks.
    pub fn value(&self, row: u32, col: u32) -> Option<String> {
        self.state().cells.get(&(row, col)).cloned()
    }

    /// Cells from row 1 down to the last non-empty row, from column 1 to the
    /// last non-empty column. Unset cells are empty strings.
    pub fn snapshot(&self) -> Vec<Vec<String>> {
        let state = self.state();
        let last_row = state.cells.keys().map(|(r, _)| *r).max().unwrap_or(0);
        let last_col = state.cells.keys().map(|(_, c)| *c).max().unwrap_or(0);

        (1..=last_row)
            .map(|row| {
                (1..=last_col)
                    .map(|col| state.cells.get(&(row, col)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for MemoryGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.snapshot().iter().enumerate() {
            writeln!(f, "{:>4} | {}", i + 1, row.join(" | "))?;
        }
        Ok(())
    }
}

#[async_trait]
impl Grid for MemoryGrid {
    async fn get_cell(&self, row: u32, col: u32) -> Result<Option<String>, GridError> {
        let state = self.state();
        self.check_bounds(state.rows, row, col)?;
        Ok(state.cells.get(&(row, col)).cloned())
    }

    async fn set_cell(&self, row: u32, col: u32, value: &str) -> Result<(), GridError> {
        let mut state = self.state();
        state.write_attempts += 1;
        let attempt = state.write_attempts;
        if let Some(error) = state.failed_writes.remove(&attempt) {
            return Err(error);
        }
        self.check_bounds(state.rows, row, col)?;
        state.cells.insert((row, col), value.to_string());
        Ok(())
    }

    async fn insert_header_row(&self, values: &[&str]) -> Result<(), GridError> {
        let mut state = self.state();
        if values.len() > self.cols as usize {
            return Err(GridError::OutOfBounds {
                row: 1,
                col: values.len() as u32,
            });
        }

        let shifted: BTreeMap<(u32, u32), String> = std::mem::take(&mut state.cells)
            .into_iter()
            .map(|((row, col), value)| ((row + 1, col), value))
            .collect();
        state.cells = shifted;
        state.rows += 1;

        for (i, value) in values.iter().enumerate() {
            state.cells.insert((1, i as u32 + 1), value.to_string());
        }
        Ok(())
    }
}

/// A set of named [`MemoryGrid`]s.
#[derive(Default)]
pub struct MemoryWorkbook {
    sheets: Mutex<Vec<(String, Arc<MemoryGrid>)>>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    fn sheets(&self) -> MutexGuard<'_, Vec<(String, Arc<MemoryGrid>)>> {
        self.sheets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn sheet(&self, title: &str) -> Option<Arc<MemoryGrid>> {
        self.sheets()
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, grid)| Arc::clone(grid))
    }

    /// Sheet titles in creation order.
    pub fn titles(&self) -> Vec<String> {
        self.sheets().iter().map(|(t, _)| t.clone()).collect()
    }
}

#[async_trait]
impl Workbook for MemoryWorkbook {
    type Sheet = Arc<MemoryGrid>;

    async fn add_sheet(&self, title: &str, rows: u32, cols: u32) -> Result<Self::Sheet, GridError> {
        let mut sheets = self.sheets();
        if sheets.iter().any(|(t, _)| t == title) {
            return Err(GridError::Backend(format!(
                "A sheet with the name \"{}\" already exists",
                title
            )));
        }
        let grid = Arc::new(MemoryGrid::new(rows, cols));
        sheets.push((title.to_string(), Arc::clone(&grid)));
        Ok(grid)
    }
}

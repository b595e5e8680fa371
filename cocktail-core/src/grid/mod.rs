//! Cell-addressable spreadsheet abstraction.
//!
//! Rows and columns are 1-indexed. The layout code only ever reads and writes
//! single cells; batching is left to the backend.

mod memory;
mod sheets;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::{MemoryGrid, MemoryWorkbook};
pub use sheets::{column_letter, SheetsConfig, SheetsGrid, SheetsWorkbook};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The backend refused the call for now; the same call may succeed later.
    #[error("Rate limited by the spreadsheet backend")]
    RateLimited,

    #[error("Cell ({row}, {col}) is outside the sheet")]
    OutOfBounds { row: u32, col: u32 },

    #[error("Spreadsheet backend error: {0}")]
    Backend(String),
}

impl GridError {
    /// Whether retrying the same write after a pause can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, GridError::RateLimited)
    }
}

/// One sheet of cells.
#[async_trait]
pub trait Grid: Send + Sync {
    /// Value of a cell, `None` when it was never set.
    async fn get_cell(&self, row: u32, col: u32) -> Result<Option<String>, GridError>;

    async fn set_cell(&self, row: u32, col: u32, value: &str) -> Result<(), GridError>;

    /// Insert a row above row 1 holding `values`, pushing everything down.
    async fn insert_header_row(&self, values: &[&str]) -> Result<(), GridError>;
}

#[async_trait]
impl<G: Grid + ?Sized> Grid for Arc<G> {
    async fn get_cell(&self, row: u32, col: u32) -> Result<Option<String>, GridError> {
        (**self).get_cell(row, col).await
    }

    async fn set_cell(&self, row: u32, col: u32, value: &str) -> Result<(), GridError> {
        (**self).set_cell(row, col, value).await
    }

    async fn insert_header_row(&self, values: &[&str]) -> Result<(), GridError> {
        (**self).insert_header_row(values).await
    }
}

/// A spreadsheet file that can hold several named sheets.
#[async_trait]
pub trait Workbook: Send + Sync {
    type Sheet: Grid;

    /// Create a sheet with a fixed capacity of `rows` x `cols`.
    async fn add_sheet(&self, title: &str, rows: u32, cols: u32) -> Result<Self::Sheet, GridError>;
}

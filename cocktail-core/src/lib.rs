pub mod error;
pub mod export;
pub mod grid;
pub mod http;
pub mod layout;
pub mod lookup;
pub mod normalize;
pub mod recipe;

#[cfg(test)]
mod test_support;

pub use error::{ConfigError, ExportError, FetchError, LookupError, MalformedResponse, QueryKind};
pub use export::{
    prepare_workbook, ExportConfig, ExportReport, Exporter, FailureKind, ItemFailure,
    RecipeSheets, SheetCursors,
};
pub use grid::{Grid, GridError, MemoryGrid, MemoryWorkbook, SheetsConfig, SheetsWorkbook, Workbook};
pub use http::{HttpClient, MockClient, MockResponse, ReqwestClient, ReqwestClientBuilder};
pub use layout::{find_next_writable_row, write_separator, Layout, ScanOptions};
pub use lookup::{LookupClient, DEFAULT_BASE_URL};
pub use normalize::{normalize, parse_instructions, InstructionFormat, RawDrink};
pub use recipe::{Recipe, TO_TASTE};

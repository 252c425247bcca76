//! External workbook source abstraction.
//!
//! The loader only sees logical tables (headers + string cells); where they
//! come from is behind the [`WorkbookSource`] trait. The shipped
//! implementation reads a directory of CSV files, one per logical table.

mod csv_workbook;
mod table;

pub use csv_workbook::CsvWorkbook;
pub use table::{Record, TableData};

use crate::errors::Result;

/// Read-only access to the logical tables of a workbook snapshot.
pub trait WorkbookSource: Send + Sync {
    /// Returns the raw table with the given logical name.
    ///
    /// A missing or structurally unreadable table is an error; an existing
    /// table with no data rows is not.
    fn table(&self, name: &str) -> Result<TableData>;

    /// Human-readable description of the source, used in diagnostics.
    fn describe(&self) -> String;
}

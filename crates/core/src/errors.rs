//! Core error types for the portfolio analytics service.
//!
//! This module defines source-agnostic error types. Workbook-format-specific
//! failures (CSV structure, encoding) are converted to these types by the
//! source layer.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the analytics core.
///
/// Queries surface `DataUnavailable` for missing data (a "not found" at the
/// API boundary) and `Source`/`Schema` for load failures (an internal
/// failure at the API boundary). Row-level parse problems never reach this
/// type; they are accumulated in the load report instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Data source operation failed: {0}")]
    Source(#[from] SourceError),

    #[error("Schema configuration error: {0}")]
    Schema(#[from] SchemaError),

    #[error("No {0} data available")]
    DataUnavailable(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Builds a `DataUnavailable` error for the named dataset.
    pub fn data_unavailable(what: impl Into<String>) -> Self {
        Error::DataUnavailable(what.into())
    }

    /// Whether this error maps to "not found" rather than "internal failure"
    /// at the API boundary.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::DataUnavailable(_))
    }
}

/// Errors raised while reaching or decoding the external workbook.
///
/// All variants are fatal to a load attempt; the previously published
/// snapshot, if any, remains authoritative.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The workbook itself (directory or file) does not exist.
    #[error("Workbook not found at '{0}'")]
    WorkbookNotFound(String),

    /// A required logical table is missing from the workbook.
    #[error("Table '{0}' not found in workbook")]
    TableNotFound(String),

    /// The table exists but could not be read or parsed structurally,
    /// even after the secondary decode attempt.
    #[error("Failed to read table '{table}': {message}")]
    TableUnreadable { table: String, message: String },
}

/// Header-mapping configuration errors.
///
/// Raised when the normalizer rules produce an ambiguous mapping; surfaced
/// at load time rather than silently picking one interpretation.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// One header matched the rules of two distinct internal fields.
    #[error("Header '{header}' matches both '{first}' and '{second}'")]
    AmbiguousHeader {
        header: String,
        first: &'static str,
        second: &'static str,
    },

    /// Two headers both mapped to the same internal field.
    #[error("Field '{field}' is claimed by both '{first}' and '{second}'")]
    DuplicateClaim {
        field: &'static str,
        first: String,
        second: String,
    },
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] chrono::ParseError),
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

//! WealthManager Core - workbook ingestion and portfolio analytics.
//!
//! This crate contains the ingestion-and-derivation core for the portfolio
//! analytics service: it parses a loosely-structured tabular workbook into a
//! normalized in-memory snapshot and computes derived metrics (allocation
//! breakdowns, period returns, diversification, risk) over it. The HTTP
//! layer consuming the query facade lives outside this crate.

pub mod analytics;
pub mod constants;
pub mod errors;
pub mod ingest;
pub mod query;
pub mod snapshot;
pub mod source;
pub mod utils;

// Re-export the facade and the snapshot model
pub use query::{PortfolioQueryService, PortfolioQueryTrait};
pub use snapshot::PortfolioSnapshot;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

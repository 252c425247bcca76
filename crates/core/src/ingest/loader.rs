//! Loads the six logical tables into a normalized snapshot.
//!
//! Per-row problems (missing primary key, unparsable date) skip the row and
//! are recorded in the load report; they never abort a table. A missing or
//! structurally unreadable table aborts the whole load attempt, so a
//! partial snapshot is never produced.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    HOLDINGS_TABLE, MARKET_CAP_TABLE, PERFORMANCE_TABLE, SECTOR_ALLOCATION_TABLE, SUMMARY_TABLE,
    TOP_PERFORMERS_TABLE,
};
use crate::errors::{Result, ValidationError};
use crate::ingest::header_rules::{HeaderMap, NormalizedField};
use crate::snapshot::{
    AllocationRow, Holding, PerformancePoint, PortfolioSnapshot, TopPerformerRow,
};
use crate::source::{Record, WorkbookSource};
use crate::utils::num_utils::{
    fraction_to_percent, normalize_percent, parse_decimal_lenient, parse_quantity,
};

/// A row skipped during ingestion, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowIssue {
    /// Zero-based data-row index within the table.
    pub row: usize,
    pub reason: String,
}

/// Ingestion outcome for one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReport {
    pub table: String,
    pub loaded: usize,
    pub skipped: Vec<RowIssue>,
}

/// Ingestion outcome for the whole workbook, making skip counts observable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub tables: Vec<TableReport>,
}

impl LoadReport {
    pub fn total_loaded(&self) -> usize {
        self.tables.iter().map(|t| t.loaded).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.tables.iter().map(|t| t.skipped.len()).sum()
    }

    fn push(&mut self, table: &str, loaded: usize, skipped: Vec<RowIssue>) {
        for issue in &skipped {
            warn!(
                "Skipped row {} of table '{}': {}",
                issue.row, table, issue.reason
            );
        }
        self.tables.push(TableReport {
            table: table.to_string(),
            loaded,
            skipped,
        });
    }
}

/// Builds a [`PortfolioSnapshot`] from a workbook source.
pub struct SnapshotLoader {
    source: Arc<dyn WorkbookSource>,
}

impl SnapshotLoader {
    pub fn new(source: Arc<dyn WorkbookSource>) -> Self {
        Self { source }
    }

    /// Loads all six tables as one atomic unit.
    pub fn load(&self) -> Result<(PortfolioSnapshot, LoadReport)> {
        debug!("Loading workbook from {}", self.source.describe());
        let mut report = LoadReport::default();

        let holdings = self.load_holdings(&mut report)?;
        let performance = self.load_performance(&mut report)?;
        let sector_allocation =
            self.load_allocation(SECTOR_ALLOCATION_TABLE, &["Sector", "sector"], &mut report)?;
        let market_cap = self.load_market_cap(&mut report)?;
        let summary = self.load_summary(&mut report)?;
        let top_performers = self.load_top_performers(&mut report)?;

        let snapshot = PortfolioSnapshot {
            holdings,
            performance,
            sector_allocation,
            market_cap,
            summary,
            top_performers,
        };
        Ok((snapshot, report))
    }

    fn load_holdings(&self, report: &mut LoadReport) -> Result<Vec<Holding>> {
        let table = self.source.table(HOLDINGS_TABLE)?;
        let map = HeaderMap::from_headers(table.headers())?;

        let mut holdings = Vec::new();
        let mut skipped = Vec::new();
        for (row, record) in table.records().enumerate() {
            let Some(symbol) = record.get_any(&["Symbol", "symbol"]) else {
                skipped.push(RowIssue {
                    row,
                    reason: ValidationError::MissingField("symbol".to_string()).to_string(),
                });
                continue;
            };

            let name = resolve(&record, &map, NormalizedField::CompanyName, &["Company Name", "name"])
                .unwrap_or_default();
            let sector = record.get_any(&["Sector", "sector"]).unwrap_or_default();
            let market_cap =
                resolve(&record, &map, NormalizedField::MarketCap, &["Market Cap", "marketCap"])
                    .unwrap_or_default();

            holdings.push(Holding {
                symbol: symbol.to_string(),
                name: name.to_string(),
                quantity: parse_quantity(
                    record.get_any(&["Quantity", "quantity"]).unwrap_or_default(),
                ),
                avg_price: parse_decimal_lenient(
                    resolve(&record, &map, NormalizedField::AvgPrice, &["Avg Price", "avgPrice"])
                        .unwrap_or_default(),
                ),
                current_price: parse_decimal_lenient(
                    resolve(
                        &record,
                        &map,
                        NormalizedField::CurrentPrice,
                        &["Current Price", "currentPrice"],
                    )
                    .unwrap_or_default(),
                ),
                sector: sector.to_string(),
                market_cap: market_cap.to_string(),
                value: parse_decimal_lenient(
                    resolve(&record, &map, NormalizedField::Value, &["Value", "value"])
                        .unwrap_or_default(),
                ),
                gain_loss: parse_decimal_lenient(
                    resolve(&record, &map, NormalizedField::GainLoss, &["Gain/Loss", "gainLoss"])
                        .unwrap_or_default(),
                ),
                gain_loss_percent: normalize_percent(parse_decimal_lenient(
                    resolve(
                        &record,
                        &map,
                        NormalizedField::GainLossPercent,
                        &["Gain/Loss %", "gainLossPercent"],
                    )
                    .unwrap_or_default(),
                )),
            });
        }

        report.push(HOLDINGS_TABLE, holdings.len(), skipped);
        Ok(holdings)
    }

    fn load_performance(&self, report: &mut LoadReport) -> Result<Vec<PerformancePoint>> {
        let table = self.source.table(PERFORMANCE_TABLE)?;

        let mut points = Vec::new();
        let mut skipped = Vec::new();
        for (row, record) in table.records().enumerate() {
            let Some(raw_date) = record.get_any(&["Date", "date"]) else {
                skipped.push(RowIssue {
                    row,
                    reason: ValidationError::MissingField("date".to_string()).to_string(),
                });
                continue;
            };
            let Some(date) = parse_date(raw_date) else {
                skipped.push(RowIssue {
                    row,
                    reason: ValidationError::InvalidInput(format!("unparsable date '{}'", raw_date)).to_string(),
                });
                continue;
            };

            points.push(PerformancePoint {
                date,
                portfolio: parse_decimal_lenient(
                    record
                        .get_any(&["Portfolio Value (₹)", "Portfolio Value", "portfolio_value", "portfolio"])
                        .unwrap_or_default(),
                ),
                nifty50: parse_decimal_lenient(
                    record.get_any(&["Nifty 50", "nifty50"]).unwrap_or_default(),
                ),
                gold: parse_decimal_lenient(
                    record
                        .get_any(&["Gold (₹/10g)", "Gold", "gold"])
                        .unwrap_or_default(),
                ),
            });
        }

        points.sort_by_key(|p| p.date);
        report.push(PERFORMANCE_TABLE, points.len(), skipped);
        Ok(points)
    }

    fn load_allocation(
        &self,
        table_name: &str,
        key_headers: &[&str],
        report: &mut LoadReport,
    ) -> Result<Vec<AllocationRow>> {
        let table = self.source.table(table_name)?;
        let map = HeaderMap::from_headers(table.headers())?;

        let mut rows = Vec::new();
        let mut skipped = Vec::new();
        for (row, record) in table.records().enumerate() {
            let Some(category) = record.get_any(key_headers) else {
                skipped.push(RowIssue {
                    row,
                    reason: ValidationError::MissingField("category".to_string()).to_string(),
                });
                continue;
            };
            rows.push(allocation_row(&record, &map, category));
        }

        report.push(table_name, rows.len(), skipped);
        Ok(rows)
    }

    fn load_market_cap(&self, report: &mut LoadReport) -> Result<Vec<AllocationRow>> {
        let table = self.source.table(MARKET_CAP_TABLE)?;
        let map = HeaderMap::from_headers(table.headers())?;

        let mut rows = Vec::new();
        let mut skipped = Vec::new();
        for (row, record) in table.records().enumerate() {
            let category =
                resolve(&record, &map, NormalizedField::MarketCap, &["Market Cap", "marketCap"]);
            let Some(category) = category else {
                skipped.push(RowIssue {
                    row,
                    reason: ValidationError::MissingField("market cap".to_string()).to_string(),
                });
                continue;
            };
            rows.push(allocation_row(&record, &map, category));
        }

        report.push(MARKET_CAP_TABLE, rows.len(), skipped);
        Ok(rows)
    }

    fn load_summary(&self, report: &mut LoadReport) -> Result<BTreeMap<String, Decimal>> {
        let table = self.source.table(SUMMARY_TABLE)?;

        let mut summary = BTreeMap::new();
        let mut skipped = Vec::new();
        for (row, record) in table.records().enumerate() {
            let Some(metric) = record.get_any(&["Metric", "metric"]) else {
                skipped.push(RowIssue {
                    row,
                    reason: ValidationError::MissingField("metric".to_string()).to_string(),
                });
                continue;
            };
            let value = parse_decimal_lenient(record.get_any(&["Value", "value"]).unwrap_or_default());
            summary.insert(metric.to_string(), value);
        }

        report.push(SUMMARY_TABLE, summary.len(), skipped);
        Ok(summary)
    }

    fn load_top_performers(
        &self,
        report: &mut LoadReport,
    ) -> Result<HashMap<String, TopPerformerRow>> {
        let table = self.source.table(TOP_PERFORMERS_TABLE)?;

        let mut performers = HashMap::new();
        let mut skipped = Vec::new();
        for (row, record) in table.records().enumerate() {
            let Some(role) = record.get_any(&["Metric", "metric"]) else {
                skipped.push(RowIssue {
                    row,
                    reason: ValidationError::MissingField("metric".to_string()).to_string(),
                });
                continue;
            };
            performers.insert(
                role.to_string(),
                TopPerformerRow {
                    symbol: record.get_any(&["Symbol", "symbol"]).unwrap_or_default().to_string(),
                    name: record
                        .get_any(&["Company Name", "Name", "name"])
                        .unwrap_or_default()
                        .to_string(),
                    performance: parse_decimal_lenient(
                        record.get_any(&["Performance", "performance"]).unwrap_or_default(),
                    ),
                },
            );
        }

        report.push(TOP_PERFORMERS_TABLE, performers.len(), skipped);
        Ok(performers)
    }
}

/// Resolves a cell through the header map first, then through the ordered
/// literal fallback spellings.
fn resolve<'a>(
    record: &Record<'a>,
    map: &HeaderMap,
    field: NormalizedField,
    fallbacks: &[&str],
) -> Option<&'a str> {
    map.header_for(field)
        .and_then(|header| record.get(header))
        .or_else(|| record.get_any(fallbacks))
}

fn allocation_row(record: &Record<'_>, map: &HeaderMap, category: &str) -> AllocationRow {
    let value = parse_decimal_lenient(
        resolve(record, map, NormalizedField::Value, &["Value", "value"]).unwrap_or_default(),
    );
    // Precomputed sheets store percentages as fractions.
    let percentage = fraction_to_percent(parse_decimal_lenient(
        record.get_any(&["Percentage", "percentage"]).unwrap_or_default(),
    ));
    AllocationRow {
        category: category.to_string(),
        value,
        percentage,
    }
}

/// Parses a calendar date, tolerating timestamp cells by truncating to the
/// ISO date prefix.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            cell.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

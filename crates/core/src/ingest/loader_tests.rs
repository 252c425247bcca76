use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::{
    HOLDINGS_TABLE, MARKET_CAP_TABLE, PERFORMANCE_TABLE, SECTOR_ALLOCATION_TABLE, SUMMARY_TABLE,
    TOP_PERFORMERS_TABLE,
};
use crate::errors::{Error, SourceError};
use crate::ingest::SnapshotLoader;
use crate::source::{TableData, WorkbookSource};

/// In-memory workbook for loader tests.
pub(crate) struct FakeWorkbook {
    tables: HashMap<String, TableData>,
    pub calls: AtomicUsize,
}

impl FakeWorkbook {
    pub(crate) fn new(tables: Vec<(&str, TableData)>) -> Self {
        Self {
            tables: tables
                .into_iter()
                .map(|(name, table)| (name.to_string(), table))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl WorkbookSource for FakeWorkbook {
    fn table(&self, name: &str) -> crate::errors::Result<TableData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::TableNotFound(name.to_string()).into())
    }

    fn describe(&self) -> String {
        "in-memory workbook".to_string()
    }
}

fn table(headers: &[&str], rows: &[&[&str]]) -> TableData {
    TableData::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

fn empty_table(headers: &[&str]) -> TableData {
    table(headers, &[])
}

/// A workbook mirroring the expected source shape, with variant headers and
/// display-formatted cells.
pub(crate) fn fixture_workbook() -> FakeWorkbook {
    FakeWorkbook::new(vec![
        (
            HOLDINGS_TABLE,
            table(
                &[
                    "Symbol",
                    "Company Name",
                    "Quantity",
                    "Avg Price ₹",
                    "Current Price (₹)",
                    "Sector",
                    "Market Cap",
                    "Value ₹",
                    "Gain/Loss (₹)",
                    "Gain/Loss %",
                ],
                &[
                    &[
                        "RELIANCE",
                        "Reliance Industries",
                        "50",
                        "2450",
                        "2680.5",
                        "Energy",
                        "Large Cap",
                        "₹1,34,025",
                        "11525",
                        "0.094",
                    ],
                    &[
                        "INFY",
                        "Infosys Limited",
                        "100",
                        "1450",
                        "1580.25",
                        "Technology",
                        "Large Cap",
                        "158025",
                        "13025",
                        "8.98",
                    ],
                    // no symbol: skipped
                    &["", "Ghost Corp", "10", "1", "1", "Energy", "Mid Cap", "10", "0", "0"],
                ],
            ),
        ),
        (
            PERFORMANCE_TABLE,
            table(
                &["Date", "Portfolio Value (₹)", "Nifty 50", "Gold (₹/10g)"],
                &[
                    // out of order plus a timestamp cell; loader sorts and truncates
                    &["2024-02-29 00:00:00", "105000", "22000", "62000"],
                    &["2024-01-31", "100000", "21500", "61000"],
                    &["not-a-date", "1", "1", "1"],
                ],
            ),
        ),
        (
            SECTOR_ALLOCATION_TABLE,
            table(
                &["Sector", "Value (₹)", "Percentage"],
                &[
                    &["Energy", "134025", "0.459"],
                    &["Technology", "158025", "0.541"],
                ],
            ),
        ),
        (
            MARKET_CAP_TABLE,
            table(
                &["Market Cap", "Value (₹)", "Percentage"],
                &[
                    &["Large Cap", "₹2,92,050", "1.0"],
                    &["Small Cap", "0", "0"],
                ],
            ),
        ),
        (
            SUMMARY_TABLE,
            table(
                &["Metric", "Value"],
                &[
                    &["Total Portfolio Value", "₹2,92,050"],
                    &["Total Invested Amount", "267500"],
                    &["Total Gain/Loss", "24550"],
                    &["Total Gain/Loss %", "0.0918"],
                ],
            ),
        ),
        (
            TOP_PERFORMERS_TABLE,
            table(
                &["Metric", "Symbol", "Company Name", "Performance"],
                &[
                    &["Best Performer", "INFY", "Infosys Limited", "0.0898"],
                    &["Worst Performer", "RELIANCE", "Reliance Industries", "0.094"],
                    &["Highest Value", "INFY", "Infosys Limited", "₹1,58,025"],
                    &["Lowest Value", "RELIANCE", "Reliance Industries", "1,34,025"],
                ],
            ),
        ),
    ])
}

#[test]
fn loads_only_rows_with_a_symbol() {
    let loader = SnapshotLoader::new(Arc::new(fixture_workbook()));
    let (snapshot, report) = loader.load().unwrap();

    assert_eq!(snapshot.holdings.len(), 2);
    let holdings_report = report
        .tables
        .iter()
        .find(|t| t.table == HOLDINGS_TABLE)
        .unwrap();
    assert_eq!(holdings_report.loaded, 2);
    assert_eq!(holdings_report.skipped.len(), 1);
    assert!(holdings_report.skipped[0].reason.contains("symbol"));
}

#[test]
fn normalizes_holding_numerics() {
    let loader = SnapshotLoader::new(Arc::new(fixture_workbook()));
    let (snapshot, _) = loader.load().unwrap();

    let reliance = &snapshot.holdings[0];
    assert_eq!(reliance.quantity, 50);
    assert_eq!(reliance.value, dec!(134025));
    // fraction 0.094 normalized to percentage scale
    assert_eq!(reliance.gain_loss_percent, dec!(9.400));

    let infy = &snapshot.holdings[1];
    // already a percentage, unchanged
    assert_eq!(infy.gain_loss_percent, dec!(8.98));
}

#[test]
fn performance_rows_are_sorted_and_bad_dates_skipped() {
    let loader = SnapshotLoader::new(Arc::new(fixture_workbook()));
    let (snapshot, report) = loader.load().unwrap();

    assert_eq!(snapshot.performance.len(), 2);
    assert!(snapshot.performance[0].date < snapshot.performance[1].date);
    assert_eq!(snapshot.performance[1].portfolio, dec!(105000));

    let perf_report = report
        .tables
        .iter()
        .find(|t| t.table == PERFORMANCE_TABLE)
        .unwrap();
    assert_eq!(perf_report.skipped.len(), 1);
}

#[test]
fn precomputed_sheets_scale_fraction_percentages() {
    let loader = SnapshotLoader::new(Arc::new(fixture_workbook()));
    let (snapshot, _) = loader.load().unwrap();

    assert_eq!(snapshot.sector_allocation[0].percentage, dec!(45.9));
    // currency-formatted value cell
    assert_eq!(snapshot.market_cap[0].value, dec!(292050));
    assert_eq!(snapshot.summary["Total Gain/Loss %"], dec!(0.0918));
    assert_eq!(
        snapshot.top_performers["Highest Value"].performance,
        dec!(158025)
    );
}

#[test]
fn missing_table_aborts_the_load() {
    let workbook = FakeWorkbook::new(vec![(
        HOLDINGS_TABLE,
        table(&["Symbol"], &[&["INFY"]]),
    )]);
    let loader = SnapshotLoader::new(Arc::new(workbook));

    let err = loader.load().unwrap_err();
    assert!(matches!(
        err,
        Error::Source(SourceError::TableNotFound(ref name)) if name.as_str() == PERFORMANCE_TABLE
    ));
}

#[test]
fn empty_precomputed_tables_load_as_empty() {
    let workbook = FakeWorkbook::new(vec![
        (
            HOLDINGS_TABLE,
            table(
                &["Symbol", "Quantity", "Avg Price", "Current Price", "Sector", "Market Cap"],
                &[&["INFY", "10", "100", "110", "Technology", "Large Cap"]],
            ),
        ),
        (
            PERFORMANCE_TABLE,
            table(&["Date", "Portfolio Value", "Nifty 50", "Gold"], &[]),
        ),
        (SECTOR_ALLOCATION_TABLE, empty_table(&["Sector", "Value (₹)", "Percentage"])),
        (MARKET_CAP_TABLE, empty_table(&["Market Cap", "Value (₹)", "Percentage"])),
        (SUMMARY_TABLE, empty_table(&["Metric", "Value"])),
        (TOP_PERFORMERS_TABLE, empty_table(&["Metric", "Symbol", "Company Name", "Performance"])),
    ]);
    let loader = SnapshotLoader::new(Arc::new(workbook));

    let (snapshot, report) = loader.load().unwrap();
    assert_eq!(snapshot.holdings.len(), 1);
    assert!(snapshot.performance.is_empty());
    assert!(snapshot.sector_allocation.is_empty());
    assert!(snapshot.summary.is_empty());
    assert_eq!(report.total_skipped(), 0);
}

#[test]
fn ambiguous_holdings_header_is_a_schema_error() {
    let workbook = FakeWorkbook::new(vec![(
        HOLDINGS_TABLE,
        table(&["Symbol", "Avg Market Cap Price"], &[&["INFY", "1"]]),
    )]);
    let loader = SnapshotLoader::new(Arc::new(workbook));

    let err = loader.load().unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
}

#[test]
fn blank_and_malformed_numerics_coerce_to_zero() {
    let workbook = FakeWorkbook::new(vec![
        (
            HOLDINGS_TABLE,
            table(
                &["Symbol", "Quantity", "Avg Price", "Current Price", "Value ₹", "Sector", "Market Cap"],
                &[&["X", "", "n/a", "", "junk", "Energy", "Mid Cap"]],
            ),
        ),
        (
            PERFORMANCE_TABLE,
            table(&["Date", "Portfolio Value", "Nifty 50", "Gold"], &[]),
        ),
        (SECTOR_ALLOCATION_TABLE, empty_table(&["Sector", "Value (₹)", "Percentage"])),
        (MARKET_CAP_TABLE, empty_table(&["Market Cap", "Value (₹)", "Percentage"])),
        (SUMMARY_TABLE, empty_table(&["Metric", "Value"])),
        (TOP_PERFORMERS_TABLE, empty_table(&["Metric", "Symbol", "Company Name", "Performance"])),
    ]);
    let loader = SnapshotLoader::new(Arc::new(workbook));

    let (snapshot, _) = loader.load().unwrap();
    let x = &snapshot.holdings[0];
    assert_eq!(x.quantity, 0);
    assert_eq!(x.avg_price, Decimal::ZERO);
    assert_eq!(x.value, Decimal::ZERO);
}

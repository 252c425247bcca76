//! Snapshot model: the six logical tables in normalized form.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One stock position as ingested from the Holdings table.
///
/// `value` and `gain_loss` are sourced independently from the sheet, so
/// `value ≈ quantity × current_price` is expected but not enforced.
/// `gain_loss_percent` is always on percentage scale (never a fraction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub name: String,
    pub quantity: i64,
    pub avg_price: Decimal,
    pub current_price: Decimal,
    pub sector: String,
    pub market_cap: String,
    pub value: Decimal,
    pub gain_loss: Decimal,
    pub gain_loss_percent: Decimal,
}

/// One observation of the portfolio against its benchmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub portfolio: Decimal,
    pub nifty50: Decimal,
    pub gold: Decimal,
}

/// One row of a precomputed allocation table (sector or market cap).
/// `percentage` is already on the 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRow {
    pub category: String,
    pub value: Decimal,
    pub percentage: Decimal,
}

/// One row of the precomputed Top_Performers table. The `performance` cell
/// holds a gain fraction for the performer roles and a monetary value for
/// the value roles; the analytics layer applies the role semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformerRow {
    pub symbol: String,
    pub name: String,
    pub performance: Decimal,
}

/// The complete normalized snapshot. Built off to the side by the loader
/// and published atomically; readers never see it half-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub holdings: Vec<Holding>,
    /// Chronologically ascending.
    pub performance: Vec<PerformancePoint>,
    pub sector_allocation: Vec<AllocationRow>,
    pub market_cap: Vec<AllocationRow>,
    /// Metric name to cleaned scalar, from the precomputed Summary table.
    pub summary: BTreeMap<String, Decimal>,
    /// Role name to record, from the precomputed Top_Performers table.
    pub top_performers: HashMap<String, TopPerformerRow>,
}

impl PortfolioSnapshot {
    pub fn has_holdings(&self) -> bool {
        !self.holdings.is_empty()
    }

    pub fn has_performance(&self) -> bool {
        !self.performance.is_empty()
    }

    /// Sum of holding values.
    pub fn total_value(&self) -> Decimal {
        self.holdings.iter().map(|h| h.value).sum()
    }
}

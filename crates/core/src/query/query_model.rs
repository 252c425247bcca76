//! Response models for the query facade.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{AllocationMap, ReturnsBySeries};
use crate::constants::{DISPLAY_DECIMAL_PRECISION, PERCENT_DECIMAL_PRECISION};
use crate::snapshot::{AllocationRow, Holding, PerformancePoint};

/// One holding as served to the API layer; `gain_loss_percent` is rounded
/// for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingView {
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

impl From<&Holding> for HoldingView {
    fn from(h: &Holding) -> Self {
        Self {
            symbol: h.symbol.clone(),
            name: h.name.clone(),
            quantity: h.quantity,
            avg_price: h.avg_price,
            current_price: h.current_price,
            sector: h.sector.clone(),
            market_cap: h.market_cap.clone(),
            value: h.value,
            gain_loss: h.gain_loss,
            gain_loss_percent: h.gain_loss_percent.round_dp(DISPLAY_DECIMAL_PRECISION),
        }
    }
}

/// Sector and market-cap allocation partitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBreakdown {
    pub by_sector: AllocationMap,
    pub by_market_cap: AllocationMap,
}

/// Timeline plus period returns per series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceData {
    pub timeline: Vec<PerformancePoint>,
    pub returns: ReturnsBySeries,
}

/// One market-cap slice for the dedicated breakdown listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketCapSlice {
    pub market_cap: String,
    pub value: Decimal,
    pub percentage: Decimal,
}

impl From<&AllocationRow> for MarketCapSlice {
    fn from(row: &AllocationRow) -> Self {
        Self {
            market_cap: row.category.clone(),
            value: row.value,
            percentage: row.percentage.round_dp(PERCENT_DECIMAL_PRECISION),
        }
    }
}

/// Readiness state of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
}

/// Health report: healthy once holdings and performance data are loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: HealthState,
    pub data_loaded: bool,
    pub timestamp: DateTime<Utc>,
}

//! Allocation breakdowns by sector and by market cap.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::precomputed_or_derive;
use crate::constants::PERCENT_DECIMAL_PRECISION;
use crate::snapshot::{AllocationRow, Holding, PortfolioSnapshot};

/// Value and share of one allocation category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBucket {
    pub value: Decimal,
    /// 0-100 scale, one decimal place.
    pub percentage: Decimal,
}

/// Buckets keyed by category label, deterministically ordered.
pub type AllocationMap = BTreeMap<String, AllocationBucket>;

/// Sector allocation: the precomputed table when present, otherwise grouped
/// from holdings.
pub fn allocation_by_sector(snapshot: &PortfolioSnapshot) -> AllocationMap {
    precomputed_or_derive(from_precomputed(&snapshot.sector_allocation, false), || {
        derive_from_holdings(&snapshot.holdings, |h| h.sector.as_str())
    })
}

/// Market-cap allocation. Zero-value buckets are dropped from the
/// precomputed table only.
pub fn allocation_by_market_cap(snapshot: &PortfolioSnapshot) -> AllocationMap {
    precomputed_or_derive(from_precomputed(&snapshot.market_cap, true), || {
        derive_from_holdings(&snapshot.holdings, |h| h.market_cap.as_str())
    })
}

fn from_precomputed(rows: &[AllocationRow], drop_zero: bool) -> Option<AllocationMap> {
    if rows.is_empty() {
        return None;
    }
    Some(
        rows.iter()
            .filter(|r| !drop_zero || r.value > Decimal::ZERO)
            .map(|r| {
                (
                    r.category.clone(),
                    AllocationBucket {
                        value: r.value,
                        percentage: r.percentage.round_dp(PERCENT_DECIMAL_PRECISION),
                    },
                )
            })
            .collect(),
    )
}

fn derive_from_holdings<'a>(
    holdings: &'a [Holding],
    category: impl Fn(&'a Holding) -> &'a str,
) -> AllocationMap {
    let total: Decimal = holdings.iter().map(|h| h.value).sum();
    if total <= Decimal::ZERO {
        // No holdings or zero total value: empty breakdown, not an error.
        return AllocationMap::new();
    }

    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for holding in holdings {
        *totals
            .entry(category(holding).to_string())
            .or_insert(Decimal::ZERO) += holding.value;
    }

    totals
        .into_iter()
        .map(|(category, value)| {
            let percentage = (value / total * dec!(100)).round_dp(PERCENT_DECIMAL_PRECISION);
            (category, AllocationBucket { value, percentage })
        })
        .collect()
}

//! Period returns of the portfolio against its benchmark series.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::PERCENT_DECIMAL_PRECISION;
use crate::snapshot::PerformancePoint;

/// Returns over the three reporting periods, percentage scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReturns {
    pub month1: Decimal,
    pub months3: Decimal,
    pub year1: Decimal,
}

/// Period returns keyed by series name (portfolio, nifty50, gold).
pub type ReturnsBySeries = BTreeMap<String, PeriodReturns>;

/// Computes period returns from the chronological timeline.
///
/// The comparison points are positional approximations over the monthly
/// series: 1 month back is the second-to-last point, 3 months back is four
/// points from the end (clamped to the start), 1 year back is the first
/// point. Fewer than two points yields an empty map.
pub fn performance_returns(points: &[PerformancePoint]) -> ReturnsBySeries {
    if points.len() < 2 {
        return ReturnsBySeries::new();
    }

    let current = &points[points.len() - 1];
    let month1 = &points[points.len() - 2];
    let months3 = &points[points.len().saturating_sub(4)];
    let year1 = &points[0];

    let series: [(&str, fn(&PerformancePoint) -> Decimal); 3] = [
        ("portfolio", |p| p.portfolio),
        ("nifty50", |p| p.nifty50),
        ("gold", |p| p.gold),
    ];

    series
        .iter()
        .map(|(name, get)| {
            (
                name.to_string(),
                PeriodReturns {
                    month1: percent_change(get(current), get(month1)),
                    months3: percent_change(get(current), get(months3)),
                    year1: percent_change(get(current), get(year1)),
                },
            )
        })
        .collect()
}

/// Percentage change, one decimal place; zero when the past value is not
/// positive.
fn percent_change(current: Decimal, past: Decimal) -> Decimal {
    if past > Decimal::ZERO {
        ((current - past) / past * dec!(100)).round_dp(PERCENT_DECIMAL_PRECISION)
    } else {
        Decimal::ZERO
    }
}

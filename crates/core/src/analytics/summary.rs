//! Portfolio summary assembly: totals, highlight records, risk figures.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{diversification_score, precomputed_or_derive, risk_level, RiskLevel};
use crate::constants::{
    BEST_PERFORMER_ROLE, DISPLAY_DECIMAL_PRECISION, HIGHEST_VALUE_ROLE, LOWEST_VALUE_ROLE,
    PERCENT_DECIMAL_PRECISION, TOTAL_GAIN_LOSS_METRIC, TOTAL_GAIN_LOSS_PCT_METRIC,
    TOTAL_INVESTED_METRIC, TOTAL_VALUE_METRIC, WORST_PERFORMER_ROLE,
};
use crate::snapshot::{Holding, PortfolioSnapshot};
use crate::utils::num_utils::fraction_to_percent;

/// One highlighted holding: a performer role carries `gain_percent`, a
/// value role carries `value`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformerHighlight {
    pub symbol: String,
    pub name: String,
    pub gain_percent: Option<Decimal>,
    pub value: Option<Decimal>,
}

/// Key portfolio metrics and insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub total_invested: Decimal,
    pub total_gain_loss: Decimal,
    pub total_gain_loss_percent: Decimal,
    pub top_performer: PerformerHighlight,
    pub worst_performer: PerformerHighlight,
    pub highest_value: PerformerHighlight,
    pub lowest_value: PerformerHighlight,
    pub diversification_score: Decimal,
    pub risk_level: RiskLevel,
}

struct Totals {
    value: Decimal,
    invested: Decimal,
    gain_loss: Decimal,
    gain_loss_percent: Decimal,
}

struct Highlights {
    top: PerformerHighlight,
    worst: PerformerHighlight,
    highest: PerformerHighlight,
    lowest: PerformerHighlight,
}

/// Builds the full summary from the snapshot. Callers guard against an
/// empty portfolio; with no holdings the derived branches produce zeroed
/// totals and empty highlight records.
pub fn assemble_summary(snapshot: &PortfolioSnapshot) -> PortfolioSummary {
    let totals = precomputed_or_derive(precomputed_totals(snapshot), || {
        derive_totals(&snapshot.holdings)
    });
    let highlights = precomputed_or_derive(precomputed_highlights(snapshot), || {
        derive_highlights(&snapshot.holdings)
    });

    let score = diversification_score(&snapshot.holdings);
    let risk = risk_level(&snapshot.holdings, score);

    PortfolioSummary {
        total_value: totals.value.round_dp(DISPLAY_DECIMAL_PRECISION),
        total_invested: totals.invested.round_dp(DISPLAY_DECIMAL_PRECISION),
        total_gain_loss: totals.gain_loss.round_dp(DISPLAY_DECIMAL_PRECISION),
        total_gain_loss_percent: totals
            .gain_loss_percent
            .round_dp(DISPLAY_DECIMAL_PRECISION),
        top_performer: highlights.top,
        worst_performer: highlights.worst,
        highest_value: highlights.highest,
        lowest_value: highlights.lowest,
        diversification_score: score.round_dp(PERCENT_DECIMAL_PRECISION),
        risk_level: risk,
    }
}

fn precomputed_totals(snapshot: &PortfolioSnapshot) -> Option<Totals> {
    if snapshot.summary.is_empty() {
        return None;
    }
    let metric = |name: &str| snapshot.summary.get(name).copied().unwrap_or_default();
    Some(Totals {
        value: metric(TOTAL_VALUE_METRIC),
        invested: metric(TOTAL_INVESTED_METRIC),
        gain_loss: metric(TOTAL_GAIN_LOSS_METRIC),
        // Stored as a fraction in the source.
        gain_loss_percent: fraction_to_percent(metric(TOTAL_GAIN_LOSS_PCT_METRIC)),
    })
}

fn derive_totals(holdings: &[Holding]) -> Totals {
    let value: Decimal = holdings.iter().map(|h| h.value).sum();
    let invested: Decimal = holdings
        .iter()
        .map(|h| Decimal::from(h.quantity) * h.avg_price)
        .sum();
    let gain_loss = value - invested;
    let gain_loss_percent = if invested > Decimal::ZERO {
        gain_loss / invested * dec!(100)
    } else {
        Decimal::ZERO
    };
    Totals {
        value,
        invested,
        gain_loss,
        gain_loss_percent,
    }
}

fn precomputed_highlights(snapshot: &PortfolioSnapshot) -> Option<Highlights> {
    if snapshot.top_performers.is_empty() {
        return None;
    }

    // Performer roles store a gain fraction; value roles store a monetary
    // amount, possibly currency-formatted in the source.
    let gain_role = |role: &str| {
        snapshot
            .top_performers
            .get(role)
            .map(|r| PerformerHighlight {
                symbol: r.symbol.clone(),
                name: r.name.clone(),
                gain_percent: Some(fraction_to_percent(r.performance)),
                value: None,
            })
            .unwrap_or(PerformerHighlight {
                gain_percent: Some(Decimal::ZERO),
                ..Default::default()
            })
    };
    let value_role = |role: &str| {
        snapshot
            .top_performers
            .get(role)
            .map(|r| PerformerHighlight {
                symbol: r.symbol.clone(),
                name: r.name.clone(),
                gain_percent: None,
                value: Some(r.performance),
            })
            .unwrap_or(PerformerHighlight {
                value: Some(Decimal::ZERO),
                ..Default::default()
            })
    };

    Some(Highlights {
        top: gain_role(BEST_PERFORMER_ROLE),
        worst: gain_role(WORST_PERFORMER_ROLE),
        highest: value_role(HIGHEST_VALUE_ROLE),
        lowest: value_role(LOWEST_VALUE_ROLE),
    })
}

fn derive_highlights(holdings: &[Holding]) -> Highlights {
    let gain_highlight = |h: &Holding| PerformerHighlight {
        symbol: h.symbol.clone(),
        name: h.name.clone(),
        gain_percent: Some(h.gain_loss_percent),
        value: None,
    };
    let value_highlight = |h: &Holding| PerformerHighlight {
        symbol: h.symbol.clone(),
        name: h.name.clone(),
        gain_percent: None,
        value: Some(h.value),
    };

    let mut by_performance: Vec<&Holding> = holdings.iter().collect();
    by_performance.sort_by(|a, b| b.gain_loss_percent.cmp(&a.gain_loss_percent));
    let mut by_value: Vec<&Holding> = holdings.iter().collect();
    by_value.sort_by(|a, b| b.value.cmp(&a.value));

    Highlights {
        top: by_performance.first().map(|h| gain_highlight(h)).unwrap_or_default(),
        worst: by_performance.last().map(|h| gain_highlight(h)).unwrap_or_default(),
        highest: by_value.first().map(|h| value_highlight(h)).unwrap_or_default(),
        lowest: by_value.last().map(|h| value_highlight(h)).unwrap_or_default(),
    }
}

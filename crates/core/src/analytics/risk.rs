//! Diversification heuristic and risk classification.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::HIGH_RISK_SECTORS;
use crate::snapshot::Holding;

/// Categorical risk label derived from diversification and high-risk
/// sector exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Conservative => "Conservative",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Aggressive => "Aggressive",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Heuristic 1.0-10.0 measure of sector spread vs. concentration.
///
/// Base score rewards distinct sectors (2 points each, capped at 10); a
/// concentration penalty of 0.1 per holding beyond ten pulls it back down.
/// An empty portfolio scores the neutral default of 5.0.
pub fn diversification_score(holdings: &[Holding]) -> Decimal {
    if holdings.is_empty() {
        return dec!(5.0);
    }

    let sectors: HashSet<&str> = holdings.iter().map(|h| h.sector.as_str()).collect();
    let base = Decimal::from((sectors.len() * 2).min(10));
    let penalty = if holdings.len() > 10 {
        Decimal::from(holdings.len() - 10) * dec!(0.1)
    } else {
        Decimal::ZERO
    };

    (base - penalty).clamp(dec!(1.0), dec!(10.0))
}

/// Classifies portfolio risk from the diversification score and the value
/// share held in high-risk sectors. Thresholds are strict: a ratio of
/// exactly 0.3 is not Conservative.
pub fn risk_level(holdings: &[Holding], diversification: Decimal) -> RiskLevel {
    if holdings.is_empty() {
        return RiskLevel::Moderate;
    }

    let total: Decimal = holdings.iter().map(|h| h.value).sum();
    let high_risk: Decimal = holdings
        .iter()
        .filter(|h| HIGH_RISK_SECTORS.contains(&h.sector.as_str()))
        .map(|h| h.value)
        .sum();
    let ratio = if total > Decimal::ZERO {
        high_risk / total
    } else {
        Decimal::ZERO
    };

    if diversification >= dec!(8) && ratio < dec!(0.3) {
        RiskLevel::Conservative
    } else if diversification >= dec!(6) && ratio < dec!(0.5) {
        RiskLevel::Moderate
    } else {
        RiskLevel::Aggressive
    }
}

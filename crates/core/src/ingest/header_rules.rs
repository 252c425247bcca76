//! Header normalization rules.
//!
//! Source workbooks do not guarantee stable column headers ("Avg Price",
//! "avg. price (₹)", "AVG PRICE" all occur in the wild). Each rule maps a
//! header to one internal field through case-insensitive token matching
//! plus an optional currency/percent marker. Rules are evaluated in
//! declared order per header; a header matching two distinct fields, or a
//! field claimed by two headers, is a configuration error rather than a
//! silent pick.

use std::collections::HashMap;

use crate::errors::{Result, SchemaError};
use crate::utils::num_utils::has_currency_marker;

/// Internal fields a header can normalize to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizedField {
    AvgPrice,
    CurrentPrice,
    Value,
    GainLoss,
    GainLossPercent,
    CompanyName,
    MarketCap,
}

impl NormalizedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizedField::AvgPrice => "avg_price",
            NormalizedField::CurrentPrice => "current_price",
            NormalizedField::Value => "value",
            NormalizedField::GainLoss => "gain_loss",
            NormalizedField::GainLossPercent => "gain_loss_percent",
            NormalizedField::CompanyName => "company_name",
            NormalizedField::MarketCap => "market_cap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    None,
    Currency,
    Percent,
}

struct HeaderRule {
    field: NormalizedField,
    tokens: &'static [&'static str],
    marker: Marker,
}

impl HeaderRule {
    fn matches(&self, header: &str) -> bool {
        let lower = header.to_lowercase();
        let tokens_match = self.tokens.iter().all(|t| lower.contains(t));
        let marker_match = match self.marker {
            Marker::None => true,
            Marker::Currency => has_currency_marker(header),
            Marker::Percent => header.contains('%'),
        };
        tokens_match && marker_match
    }
}

const RULES: [HeaderRule; 7] = [
    HeaderRule {
        field: NormalizedField::AvgPrice,
        tokens: &["avg", "price"],
        marker: Marker::None,
    },
    HeaderRule {
        field: NormalizedField::CurrentPrice,
        tokens: &["current", "price"],
        marker: Marker::None,
    },
    HeaderRule {
        field: NormalizedField::Value,
        tokens: &["value"],
        marker: Marker::Currency,
    },
    HeaderRule {
        field: NormalizedField::GainLoss,
        tokens: &["gain", "loss"],
        marker: Marker::Currency,
    },
    HeaderRule {
        field: NormalizedField::GainLossPercent,
        tokens: &["gain", "loss"],
        marker: Marker::Percent,
    },
    HeaderRule {
        field: NormalizedField::CompanyName,
        tokens: &["company", "name"],
        marker: Marker::None,
    },
    HeaderRule {
        field: NormalizedField::MarketCap,
        tokens: &["market", "cap"],
        marker: Marker::None,
    },
];

/// Mapping from internal fields to the originating headers of one table.
#[derive(Debug, Default)]
pub struct HeaderMap {
    by_field: HashMap<NormalizedField, String>,
}

impl HeaderMap {
    /// Builds the mapping for a table's headers.
    ///
    /// Unmatched headers stay unmapped; callers fall back to literal
    /// spellings for those. Ambiguous matches are a `SchemaError`.
    pub fn from_headers(headers: &[String]) -> Result<Self> {
        let mut by_field: HashMap<NormalizedField, String> = HashMap::new();

        for header in headers {
            let mut matched: Option<NormalizedField> = None;
            for rule in &RULES {
                if !rule.matches(header) {
                    continue;
                }
                match matched {
                    None => matched = Some(rule.field),
                    Some(first) if first != rule.field => {
                        return Err(SchemaError::AmbiguousHeader {
                            header: header.clone(),
                            first: first.as_str(),
                            second: rule.field.as_str(),
                        }
                        .into());
                    }
                    Some(_) => {}
                }
            }

            if let Some(field) = matched {
                if let Some(previous) = by_field.insert(field, header.clone()) {
                    return Err(SchemaError::DuplicateClaim {
                        field: field.as_str(),
                        first: previous,
                        second: header.clone(),
                    }
                    .into());
                }
            }
        }

        Ok(Self { by_field })
    }

    /// The originating header mapped to `field`, if any.
    pub fn header_for(&self, field: NormalizedField) -> Option<&str> {
        self.by_field.get(&field).map(|s| s.as_str())
    }
}

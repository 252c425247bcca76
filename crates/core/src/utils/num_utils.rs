//! Lenient numeric coercion for spreadsheet cells.
//!
//! Source workbooks mix plain numbers with display strings such as
//! "₹1,234.50" or "12.5%". All parsers here are total: a blank or
//! unparsable cell coerces to zero instead of failing the row.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Currency glyphs stripped before numeric parsing.
const CURRENCY_GLYPHS: [char; 4] = ['₹', '$', '€', '£'];

/// Returns true if the text carries one of the recognized currency glyphs.
pub fn has_currency_marker(text: &str) -> bool {
    text.chars().any(|c| CURRENCY_GLYPHS.contains(&c))
}

/// Parses a possibly currency- or percent-formatted cell into a Decimal.
///
/// Strips thousands separators, currency glyphs, and percent signs before
/// parsing. Blank or unparsable input yields zero.
pub fn parse_decimal_lenient(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| !CURRENCY_GLYPHS.contains(c) && *c != ',' && *c != '%')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    cleaned.parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

/// Parses an integer quantity, truncating fractional input.
pub fn parse_quantity(raw: &str) -> i64 {
    parse_decimal_lenient(raw).trunc().to_i64().unwrap_or(0)
}

/// Normalizes a gain/loss percentage to percentage scale.
///
/// Source files encode the column either as a fraction in [-1, 1] or as a
/// percentage. Magnitudes <= 1 are scaled by 100; larger magnitudes pass
/// through unchanged, so the operation is idempotent.
pub fn normalize_percent(value: Decimal) -> Decimal {
    if value.abs() <= Decimal::ONE {
        value * dec!(100)
    } else {
        value
    }
}

/// Converts a fraction read from a precomputed sheet to percentage scale.
pub fn fraction_to_percent(value: Decimal) -> Decimal {
    value * dec!(100)
}

//! Amount parsing for mixed French/English receipt formats.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a printed amount into a [`Decimal`].
///
/// Everything but digits and separators is stripped. When both ',' and '.'
/// appear, the comma is taken as the decimal separator and the dot as a
/// thousands separator; a lone comma is also decimal. This matches the
/// receipts this system targets and is a format assumption, not a locale
/// rule.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') && cleaned.contains('.') {
        cleaned.replace('.', "").replace(',', ".")
    } else if cleaned.contains(',') {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).ok()
}

/// Parse an optional quantity capture, defaulting to 1.
pub fn parse_quantity(raw: Option<&str>) -> Decimal {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| Decimal::from_str(&s.replace(',', ".")).ok())
        .filter(|qty| *qty > Decimal::ZERO)
        .unwrap_or(Decimal::ONE)
}

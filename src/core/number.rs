//! Parsing of Brazilian-locale numeric and currency text.

use crate::core::error::FormatError;

/// Currency marker that may prefix a monetary value, e.g. `R$ 12,34`.
const CURRENCY_PREFIX: &str = "R$";

/// Parses a number written with `.` as thousands separator and `,` as decimal
/// separator, optionally prefixed by `R$`.
///
/// `"1.234,56"` becomes `1234.56`; `"R$ 12,3400"` becomes `12.34`.
pub fn parse_locale_number(text: &str) -> Result<f64, FormatError> {
    let trimmed = text.trim();
    let unprefixed = trimmed
        .strip_prefix(CURRENCY_PREFIX)
        .map(str::trim_start)
        .unwrap_or(trimmed);

    let normalized = unprefixed.replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return Err(FormatError::new(text));
    }

    // `f64::from_str` accepts "inf" and "NaN", which are not figures a page shows.
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormatError::new(text)),
    }
}

/// Rounds to `places` decimal places, half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Formats a value as the site's currency display with four decimals, e.g. `R$ 0.1083`.
pub fn format_currency4(value: f64) -> String {
    format!("{CURRENCY_PREFIX} {value:.4}")
}

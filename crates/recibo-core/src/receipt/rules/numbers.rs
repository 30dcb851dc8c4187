//! Numeric normalization for mixed separator conventions
//!
//! Receipts mix US (`1,234.56`) and European/Latin-American (`1.234,56`)
//! formats with no reliable marker. The deciding signal is the length of
//! the trailing separator group: two characters or fewer means a decimal
//! fraction, anything longer means thousands grouping.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Normalizes a raw numeric substring into a decimal value.
///
/// The input must contain only digits, dots, and commas (currency symbols
/// already stripped). Returns `None` when no digits survive or the string
/// contains foreign characters.
pub fn normalize_number(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    if raw.chars().any(|c| !c.is_ascii_digit() && c != '.' && c != ',') {
        return None;
    }

    let segments: Vec<&str> = raw.split(['.', ',']).collect();
    let normalized = match segments.len() {
        1 => segments[0].to_string(),
        _ => {
            let last = segments[segments.len() - 1];
            if !last.is_empty() && last.len() <= 2 {
                // Short trailing group is the decimal fraction, everything
                // before it concatenates into the integer part.
                let integer: String = segments[..segments.len() - 1].concat();
                let integer = if integer.is_empty() { "0".to_string() } else { integer };
                format!("{integer}.{last}")
            } else {
                segments.concat()
            }
        }
    };

    Decimal::from_str(&normalized).ok()
}

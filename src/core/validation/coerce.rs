//! Coercion rules applied to raw form strings before the constraint checks
//!
//! Each function is total: it never fails, it maps input it cannot coerce to
//! `None` (or an empty string) and lets the schema report the constraint
//! violation.

use crate::core::invoice::InvoiceStatus;

/// Coerce a submitted amount into a number.
///
/// - missing, empty or whitespace-only input coerces to `0.0`
/// - surrounding whitespace is ignored
/// - anything that does not parse as a finite number yields `None`
pub fn coerce_amount(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Parse the status field; exact match against `pending` / `paid`.
pub fn parse_status(raw: Option<&str>) -> Option<InvoiceStatus> {
    raw.and_then(|s| s.parse().ok())
}

/// Trim a free-text identifier; missing input becomes the empty string.
pub fn required_text(raw: Option<&str>) -> String {
    raw.map(str::trim).unwrap_or_default().to_string()
}

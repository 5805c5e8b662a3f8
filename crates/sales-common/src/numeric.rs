//! Numeric coercion, rounding and formatting.
//!
//! Measures (price, quantity, rating) arrive as text. Anything that does not
//! parse to a finite number is coerced to `0.0`; callers learn about the
//! substitution through the `defaulted` flag so it can be counted.

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Coerce a raw measure cell to a number.
///
/// Returns the value and whether it was defaulted to zero (missing,
/// unparseable or non-finite input).
///
/// # Examples
///
/// ```
/// use sales_common::coerce_measure;
///
/// assert_eq!(coerce_measure(Some("3")), (3.0, false));
/// assert_eq!(coerce_measure(Some("three")), (0.0, true));
/// assert_eq!(coerce_measure(Some("NaN")), (0.0, true));
/// assert_eq!(coerce_measure(None), (0.0, true));
/// ```
pub fn coerce_measure(raw: Option<&str>) -> (f64, bool) {
    match raw.and_then(parse_f64) {
        Some(value) if value.is_finite() => (value, false),
        _ => (0.0, true),
    }
}

/// Round to two decimal places, ties to even on the scaled value.
///
/// Values too large to scale by 100 have no fractional part and are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use sales_common::round_to_cents;
///
/// assert_eq!(round_to_cents(64.000_000_000_1), 64.0);
/// assert_eq!(round_to_cents(3.14159), 3.14);
/// assert_eq!(round_to_cents(0.125), 0.12);
/// assert_eq!(round_to_cents(1e307), 1e307);
/// ```
pub fn round_to_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / 100.0
}

/// Formats a floating-point number without a trailing fractional zero.
///
/// # Examples
///
/// ```
/// use sales_common::format_numeric;
///
/// assert_eq!(format_numeric(7.0), "7");
/// assert_eq!(format_numeric(100.0), "100");
/// assert_eq!(format_numeric(12.5), "12.5");
/// assert_eq!(format_numeric(-0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    // f64 Display never uses exponent notation and omits ".0".
    format!("{v}")
}

//! Text normalization for column names, join keys and category values.

/// Strip single quotes, a byte-order mark and surrounding whitespace from a
/// raw column name.
///
/// # Examples
///
/// ```
/// use sales_common::clean_column_name;
///
/// assert_eq!(clean_column_name(" 'invoice_id' "), "invoice_id");
/// assert_eq!(clean_column_name("price"), "price");
/// ```
pub fn clean_column_name(raw: &str) -> String {
    raw.replace('\'', "")
        .trim()
        .trim_matches('\u{feff}')
        .trim()
        .to_string()
}

/// Normalize a join key so textual and numeric spellings of one id compare equal.
///
/// Integral numbers lose their fractional part (`"7.0"` becomes `"7"`),
/// everything else is only trimmed. Blank keys normalize to `None`.
///
/// # Examples
///
/// ```
/// use sales_common::normalize_key;
///
/// assert_eq!(normalize_key(" 7.0 "), Some("7".to_string()));
/// assert_eq!(normalize_key("C-101"), Some("C-101".to_string()));
/// assert_eq!(normalize_key("  "), None);
/// ```
pub fn normalize_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(number) = trimmed.parse::<f64>()
        && number.is_finite()
        && number.fract() == 0.0
        && number.abs() < 1e15
    {
        return Some(format!("{}", number as i64));
    }
    Some(trimmed.to_string())
}

/// Title-case a value: the first letter of every alphabetic run is upper-cased
/// and the rest lower-cased. Surrounding whitespace is trimmed.
///
/// # Examples
///
/// ```
/// use sales_common::title_case;
///
/// assert_eq!(title_case("  credit card "), "Credit Card");
/// assert_eq!(title_case("E-WALLET"), "E-Wallet");
/// assert_eq!(title_case("health and beauty"), "Health And Beauty");
/// assert_eq!(title_case("o'neil"), "O'Neil");
/// ```
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_alpha = false;
    for ch in value.trim().chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(ch);
            previous_alpha = false;
        }
    }
    out
}

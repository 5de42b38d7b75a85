//! Chilean peso formatting
//!
//! Pesos have no minor unit, so amounts are rounded to whole pesos and
//! grouped with `.` as the thousands separator.

use crate::{FormatError, Result};

/// ISO code appended by the labelled form
pub const CURRENCY_LABEL: &str = "CLP";

/// Format an amount as Chilean pesos
///
/// # Arguments
/// * `amount` - Amount in pesos, rounded to the nearest peso
/// * `with_label` - Append ` CLP`
///
/// # Examples
/// ```
/// use cl_format::format_clp;
/// assert_eq!(format_clp(12345.0, false), "$12.345");
/// assert_eq!(format_clp(-1000.0, false), "-$1.000");
/// assert_eq!(format_clp(25000.0, true), "$25.000 CLP");
/// ```
pub fn format_clp(amount: f64, with_label: bool) -> String {
    let pesos = if amount.is_finite() {
        amount.round() as i64
    } else {
        0
    };
    let sign = if pesos < 0 { "-" } else { "" };
    let grouped = group_thousands(pesos.unsigned_abs(), '.');

    if with_label {
        format!("{sign}${grouped} {CURRENCY_LABEL}")
    } else {
        format!("{sign}${grouped}")
    }
}

/// Parse a typed peso amount such as `$12.345`, `12345` or `12.345 CLP`
///
/// Thousands separators and the currency sign are ignored. Decimals are
/// not accepted because pesos have none.
pub fn parse_clp(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_suffix(CURRENCY_LABEL)
        .unwrap_or(trimmed)
        .trim_end();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let rest = rest.trim_start_matches('$').trim();

    let digits: String = rest.chars().filter(|c| *c != '.').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(FormatError::InvalidAmount(input.to_string()));
    }

    let value: i64 = digits
        .parse()
        .map_err(|_| FormatError::InvalidAmount(input.to_string()))?;
    Ok(if negative { -value } else { value })
}

/// Format integer with thousand separators
fn group_thousands(n: u64, sep: char) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(sep);
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, '.'), "0");
        assert_eq!(group_thousands(999, '.'), "999");
        assert_eq!(group_thousands(1000, '.'), "1.000");
        assert_eq!(group_thousands(1234567, '.'), "1.234.567");
    }

    #[test]
    fn test_format_clp_rounds_to_pesos() {
        assert_eq!(format_clp(0.0, false), "$0");
        assert_eq!(format_clp(84033.61, false), "$84.034");
        assert_eq!(format_clp(15966.39, false), "$15.966");
        assert_eq!(format_clp(-0.4, false), "$0");
    }

    #[test]
    fn test_format_clp_label() {
        assert_eq!(format_clp(100000.0, true), "$100.000 CLP");
    }

    #[test]
    fn test_format_clp_non_finite() {
        assert_eq!(format_clp(f64::NAN, false), "$0");
    }

    #[test]
    fn test_parse_clp() {
        assert_eq!(parse_clp("$12.345").unwrap(), 12345);
        assert_eq!(parse_clp(" 12345 ").unwrap(), 12345);
        assert_eq!(parse_clp("$25.000 CLP").unwrap(), 25000);
        assert_eq!(parse_clp("-$1.000").unwrap(), -1000);
    }

    #[test]
    fn test_parse_clp_rejects_garbage() {
        assert!(parse_clp("").is_err());
        assert!(parse_clp("$").is_err());
        assert!(parse_clp("12,50").is_err());
        assert!(parse_clp("doce").is_err());
    }
}

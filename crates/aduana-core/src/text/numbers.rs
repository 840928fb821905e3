//! Locale-aware numeric parsing.
//!
//! Invoices and declarations mix `1.234,56` and `1,234.56` freely. The
//! separator that occurs last is taken as the decimal separator.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

/// Reduce a numeric-looking string to a plain `1234.56` form.
///
/// Only digits, `.`, `,` and `-` survive. When both separators occur the last
/// one is the decimal separator and every earlier separator is grouping. A
/// lone comma is decimal, repeated commas without a dot are rejected, and
/// dots alone are left for the float parser.
fn normalize_separators(s: &str) -> Option<String> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');

    let decimal_pos = match (last_comma, last_dot) {
        (Some(c), Some(d)) => c.max(d),
        (Some(_), None) if cleaned.matches(',').count() > 1 => return None,
        (Some(c), None) => c,
        (None, _) => return Some(cleaned),
    };

    let normalized = cleaned
        .char_indices()
        .filter_map(|(i, c)| match c {
            '.' | ',' if i == decimal_pos => Some('.'),
            '.' | ',' => None,
            other => Some(other),
        })
        .collect();

    Some(normalized)
}

/// Parse a free-form numeric string into a float.
///
/// Returns `None` on empty input or when the cleaned text is not a number.
///
/// ```
/// use aduana_core::text::parse_locale_number;
///
/// assert_eq!(parse_locale_number("1.234,56"), Some(1234.56));
/// assert_eq!(parse_locale_number("1,234.56"), Some(1234.56));
/// assert_eq!(parse_locale_number("n/a"), None);
/// ```
pub fn parse_locale_number(s: &str) -> Option<f64> {
    normalize_separators(s)?.parse::<f64>().ok()
}

/// Parse a free-form numeric string into an exact decimal.
pub fn parse_locale_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(&normalize_separators(s)?).ok()
}

/// Round a monetary value to two decimals.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// Leading integer of a quantity string, coerced through a float so that
/// `"6,0"` and `"6.5"` both yield `6`.
pub fn quantity_as_integer(s: &str) -> Option<i64> {
    lazy_static::lazy_static! {
        static ref LEADING_NUMBER: regex::Regex =
            regex::Regex::new(r"(\d+(?:[,.]\d+)?)").unwrap();
    }

    let caps = LEADING_NUMBER.captures(s)?;
    let value = caps[1].replace(',', ".").parse::<f64>().ok()?;
    Decimal::from_f64_retain(value)?.trunc().to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_separators_last_wins() {
        assert_eq!(parse_locale_number("1.234,56"), Some(1234.56));
        assert_eq!(parse_locale_number("1,234.56"), Some(1234.56));
        assert_eq!(parse_locale_number("12.345.678,90"), Some(12345678.90));
        assert_eq!(parse_locale_number("12,345,678.90"), Some(12345678.90));
    }

    #[test]
    fn test_single_separator() {
        assert_eq!(parse_locale_number("360,00"), Some(360.0));
        assert_eq!(parse_locale_number("9.54"), Some(9.54));
        assert_eq!(parse_locale_number("1234"), Some(1234.0));
        assert_eq!(parse_locale_number("-12,5"), Some(-12.5));
    }

    #[test]
    fn test_noise_is_stripped() {
        assert_eq!(parse_locale_number("USD 1.234,56 "), Some(1234.56));
        assert_eq!(parse_locale_number("3 434,40"), Some(3434.40));
    }

    #[test]
    fn test_failures_return_none() {
        assert_eq!(parse_locale_number(""), None);
        assert_eq!(parse_locale_number("abc"), None);
        assert_eq!(parse_locale_number("-"), None);
        assert_eq!(parse_locale_number("1.2.3"), None);
        assert_eq!(parse_locale_number("12-34"), None);
        assert_eq!(parse_locale_number("1,234,567"), None);
        assert_eq!(parse_locale_decimal("1,234,567"), None);
    }

    #[test]
    fn test_decimal_variant() {
        assert_eq!(
            parse_locale_decimal("1.234,56"),
            Some(Decimal::from_str("1234.56").unwrap())
        );
        assert_eq!(parse_locale_decimal(""), None);
    }

    #[test]
    fn test_quantity_as_integer() {
        assert_eq!(quantity_as_integer("6"), Some(6));
        assert_eq!(quantity_as_integer("(31) UND"), Some(31));
        assert_eq!(quantity_as_integer("6,75"), Some(6));
        assert_eq!(quantity_as_integer("UND"), None);
    }
}

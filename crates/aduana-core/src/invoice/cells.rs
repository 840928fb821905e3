//! Typed cell construction and derived line values.

use rust_decimal::Decimal;

use crate::error::ExtractionError;
use crate::models::invoice::{CellValue, InvoiceLine};
use crate::text::{parse_locale_decimal, round_money};

/// A numeric cell parsed with the locale parser; unparseable or missing
/// input becomes [`CellValue::Empty`].
pub fn numeric_cell(raw: Option<&str>) -> CellValue {
    raw.and_then(parse_locale_decimal).into()
}

/// A trimmed text cell; blank or missing input becomes [`CellValue::Empty`].
pub fn text_cell(raw: Option<&str>) -> CellValue {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => CellValue::Text(s.to_string()),
        _ => CellValue::Empty,
    }
}

/// Parse a value a fixed-layout pattern already captured as numeric.
/// Failure here means the pattern and the parser disagree.
pub fn required_number(field: &str, raw: &str) -> Result<Decimal, ExtractionError> {
    parse_locale_decimal(raw).ok_or_else(|| ExtractionError::parse(field, raw))
}

/// `quantity × price` rounded to two decimals; a product outside the decimal
/// range is a parse fault on `Total`.
pub fn line_total(quantity: Decimal, price: Decimal) -> Result<Decimal, ExtractionError> {
    quantity
        .checked_mul(price)
        .map(round_money)
        .ok_or_else(|| ExtractionError::parse("Total", format!("{} x {}", quantity, price)))
}

/// Fill in `Total` when the line has none.
///
/// `Quantity × Unit_Price` rounded to two decimals, or the `Amount_HT` value
/// when only `Quantity` and `Amount_HT` are known. A product too large to
/// represent leaves `Total` unset.
pub fn derive_total(line: &mut InvoiceLine) {
    if line.get("Total").is_some_and(|t| !t.is_empty()) {
        return;
    }

    let number = |name: &str| line.get(name).and_then(CellValue::as_number);
    let total = match (number("Quantity"), number("Unit_Price"), number("Amount_HT")) {
        (Some(quantity), Some(price), _) => line_total(quantity, price).ok(),
        (Some(_), None, Some(amount)) => Some(amount),
        _ => None,
    };

    if let Some(total) = total {
        line.insert("Total".to_string(), CellValue::Number(total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_cells() {
        assert_eq!(numeric_cell(Some("1.234,56")), CellValue::Number(dec("1234.56")));
        assert_eq!(numeric_cell(Some("n/a")), CellValue::Empty);
        assert_eq!(numeric_cell(None), CellValue::Empty);
        assert_eq!(text_cell(Some("  Bomba ")), CellValue::Text("Bomba".to_string()));
        assert_eq!(text_cell(Some("  ")), CellValue::Empty);
    }

    #[test]
    fn test_total_from_unit_price() {
        let mut line = InvoiceLine::new();
        line.insert("Quantity".into(), dec("3").into());
        line.insert("Unit_Price".into(), dec("9.545").into());
        derive_total(&mut line);
        assert_eq!(line["Total"], CellValue::Number(dec("28.64")));
    }

    #[test]
    fn test_total_from_amount_ht() {
        let mut line = InvoiceLine::new();
        line.insert("Quantity".into(), dec("360").into());
        line.insert("Amount_HT".into(), dec("3434.40").into());
        derive_total(&mut line);
        assert_eq!(line["Total"], CellValue::Number(dec("3434.40")));
    }

    #[test]
    fn test_existing_total_kept() {
        let mut line = InvoiceLine::new();
        line.insert("Quantity".into(), dec("2").into());
        line.insert("Unit_Price".into(), dec("5").into());
        line.insert("Total".into(), dec("9.99").into());
        derive_total(&mut line);
        assert_eq!(line["Total"], CellValue::Number(dec("9.99")));
    }

    #[test]
    fn test_overflowing_total_left_unset() {
        let mut line = InvoiceLine::new();
        line.insert("Quantity".into(), Decimal::MAX.into());
        line.insert("Unit_Price".into(), dec("2").into());
        derive_total(&mut line);
        assert!(!line.contains_key("Total"));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(dec("3"), dec("9.545")).unwrap(), dec("28.64"));
        assert!(matches!(
            line_total(Decimal::MAX, dec("2")),
            Err(ExtractionError::Parse { .. })
        ));
    }

    #[test]
    fn test_no_total_without_quantity() {
        let mut line = InvoiceLine::new();
        line.insert("Unit_Price".into(), dec("5").into());
        derive_total(&mut line);
        assert!(!line.contains_key("Total"));
    }
}

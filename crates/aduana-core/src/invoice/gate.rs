//! Fixed-layout parser for invoices listing `<qty> EA ...` lines.

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ExtractionError;
use crate::models::invoice::{CellValue, InvoiceDocument, InvoiceLine, InvoiceTable};

use super::cells::required_number;
use super::chain::InvoiceParser;
use super::patterns::{
    GATE_CUSTOMER_NO, GATE_INVOICE_DATE, GATE_INVOICE_NO, GATE_LINE, GATE_PURCHASE_ORDER,
    GATE_SHIPMENT_NO,
};

/// Parser for the Gate invoice layout.
///
/// Header fields are repeated on every line item.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateParser;

impl GateParser {
    pub fn new() -> Self {
        Self
    }

    fn header_fields(text: &str) -> Vec<(&'static str, CellValue)> {
        let patterns: [(&'static str, &Regex); 5] = [
            ("Invoice", &*GATE_INVOICE_NO),
            ("Date", &*GATE_INVOICE_DATE),
            ("Shipment_No", &*GATE_SHIPMENT_NO),
            ("Purchase_Order", &*GATE_PURCHASE_ORDER),
            ("Customer_Number", &*GATE_CUSTOMER_NO),
        ];

        patterns
            .into_iter()
            .map(|(name, pattern)| {
                let value = pattern
                    .captures(text)
                    .and_then(|caps| caps.get(1))
                    .map(|m| CellValue::Text(m.as_str().trim().to_string()))
                    .unwrap_or(CellValue::Empty);
                (name, value)
            })
            .collect()
    }
}

impl InvoiceParser for GateParser {
    fn name(&self) -> &'static str {
        "gate"
    }

    fn attempt(&self, doc: &InvoiceDocument) -> Result<Option<InvoiceTable>, ExtractionError> {
        let text = doc.full_text();
        if !GATE_LINE.is_match(&text) {
            return Ok(None);
        }

        let header = Self::header_fields(&text);
        let mut table = InvoiceTable::new(self.name());

        for caps in GATE_LINE.captures_iter(&text) {
            let quantity: Decimal = caps[1]
                .parse()
                .map_err(|_| ExtractionError::parse("Quantity", &caps[1]))?;

            let mut line = InvoiceLine::new();
            for (name, value) in &header {
                line.insert(name.to_string(), value.clone());
            }
            line.insert("Quantity".into(), quantity.into());
            line.insert("Description".into(), caps[2].trim().into());
            line.insert("Code".into(), CellValue::from(&caps[3]));
            line.insert("Unit_Price".into(), dotted_number("Unit_Price", &caps[4])?.into());
            line.insert("Total".into(), dotted_number("Total", &caps[5])?.into());

            table.push(line);
        }

        Ok(table.non_empty())
    }
}

/// Gate prints plain `1234.56` amounts; anything else is a fault.
fn dotted_number(field: &str, raw: &str) -> Result<Decimal, ExtractionError> {
    if raw.matches('.').count() > 1 {
        return Err(ExtractionError::parse(field, raw));
    }
    required_number(field, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const INVOICE: &str = "\
GATE S.A.
INVOICE NO.   INVOICE DATE
12345I        05-MAR-2024
SHIPMENT NO:  PURCHASE ORD NO:   CUSTOMER NO:
1234567       24-0012 ABC        654321
10 EA OIL FILTER 1234567890 1 9.50 95.00
2 EA WATER PUMP-X 99887766 1 40.00 80.00";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parses_lines_with_header() {
        let doc = InvoiceDocument::from_text_pages("gate.pdf", [INVOICE]);
        let table = GateParser.attempt(&doc).unwrap().unwrap();

        assert_eq!(table.parser, "gate");
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns,
            vec![
                "Invoice",
                "Date",
                "Shipment_No",
                "Purchase_Order",
                "Customer_Number",
                "Quantity",
                "Description",
                "Code",
                "Unit_Price",
                "Total",
            ]
        );

        let first = &table.rows[0];
        assert_eq!(first["Invoice"], CellValue::from("12345I"));
        assert_eq!(first["Date"], CellValue::from("05-MAR-2024"));
        assert_eq!(first["Shipment_No"], CellValue::from("1234567"));
        assert_eq!(first["Purchase_Order"], CellValue::from("24-0012 ABC"));
        assert_eq!(first["Customer_Number"], CellValue::from("654321"));
        assert_eq!(first["Quantity"], CellValue::Number(dec("10")));
        assert_eq!(first["Description"], CellValue::from("OIL FILTER"));
        assert_eq!(first["Code"], CellValue::from("1234567890"));
        assert_eq!(first["Unit_Price"], CellValue::Number(dec("9.50")));
        assert_eq!(first["Total"], CellValue::Number(dec("95.00")));

        assert_eq!(table.rows[1]["Description"], CellValue::from("WATER PUMP-X"));
        assert_eq!(table.total(), dec("175.00"));
    }

    #[test]
    fn test_not_applicable_without_lines() {
        let doc = InvoiceDocument::from_text_pages("other.pdf", ["INVOICE NO. 1"]);
        assert!(GateParser.attempt(&doc).unwrap().is_none());
    }

    #[test]
    fn test_malformed_amount_is_a_fault() {
        let doc = InvoiceDocument::from_text_pages(
            "bad.pdf",
            ["10 EA OIL FILTER 1234567890 1 9.5.0 95.00"],
        );
        assert!(GateParser.attempt(&doc).is_err());
    }
}

//! Fixed-layout parser for Spanish Sofabex invoices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::models::invoice::{InvoiceDocument, InvoiceLine, InvoiceTable};

use super::cells::{line_total, required_number, text_cell};
use super::chain::InvoiceParser;
use super::patterns::SOFABEX_LINE;

/// Invoice language, guessed from keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
    Fr,
}

/// Guess the language of an invoice. Spanish unless an English or French
/// keyword says otherwise.
pub fn detect_language(text: &str) -> Language {
    if text.contains("Cantidad") || text.contains("TENSOR") {
        Language::Es
    } else if text.contains("ITEM") {
        Language::En
    } else if text.contains("Libellé") {
        Language::Fr
    } else {
        Language::Es
    }
}

/// Parser for numbered Spanish lines:
/// `<ln> <code> [<code2>] <description> [<brand>] <qty> <price>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SofabexParser;

impl SofabexParser {
    pub fn new() -> Self {
        Self
    }
}

impl InvoiceParser for SofabexParser {
    fn name(&self) -> &'static str {
        "sofabex"
    }

    fn attempt(&self, doc: &InvoiceDocument) -> Result<Option<InvoiceTable>, ExtractionError> {
        if detect_language(&doc.full_text()) != Language::Es {
            return Ok(None);
        }

        let mut table = InvoiceTable::new(self.name());
        for text in doc.lines() {
            let Some(caps) = SOFABEX_LINE.captures(text) else {
                continue;
            };

            let quantity: Decimal = caps[6]
                .parse()
                .map_err(|_| ExtractionError::parse("Quantity", &caps[6]))?;
            let price = required_number("Unit_Price", &caps[7])?;

            let mut line = InvoiceLine::new();
            line.insert("Line_Number".into(), text_cell(Some(&caps[1])));
            line.insert("Code".into(), text_cell(Some(&caps[2])));
            line.insert("Code_2".into(), text_cell(caps.get(3).map(|m| m.as_str())));
            line.insert("Description".into(), text_cell(Some(&caps[4])));
            line.insert("Brand".into(), text_cell(caps.get(5).map(|m| m.as_str())));
            line.insert("Quantity".into(), quantity.into());
            line.insert("Unit_Price".into(), price.into());
            line.insert("Total".into(), line_total(quantity, price)?.into());

            table.push(line);
        }

        Ok(table.non_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::CellValue;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("Cantidad Precio"), Language::Es);
        assert_eq!(detect_language("ITEM QTY"), Language::En);
        assert_eq!(detect_language("Lg Libellé Qté"), Language::Fr);
        assert_eq!(detect_language("sin pistas"), Language::Es);
    }

    #[test]
    fn test_parses_spanish_lines() {
        let doc = InvoiceDocument::from_text_pages(
            "sofabex.pdf",
            ["LN Codigo Descripcion Marca Cantidad Precio\n\
              1 N3005 N3005-B TENSOR CORREA GMB 4 12,50\n\
              Total 50,00"],
        );
        let table = SofabexParser.attempt(&doc).unwrap().unwrap();

        assert_eq!(table.len(), 1);
        let line = &table.rows[0];
        assert_eq!(line["Line_Number"], CellValue::from("1"));
        assert_eq!(line["Code"], CellValue::from("N3005"));
        assert_eq!(line["Code_2"], CellValue::from("N3005-B"));
        assert_eq!(line["Description"], CellValue::from("TENSOR CORREA"));
        assert_eq!(line["Brand"], CellValue::from("GMB"));
        assert_eq!(line["Quantity"], CellValue::Number(dec("4")));
        assert_eq!(line["Unit_Price"], CellValue::Number(dec("12.50")));
        assert_eq!(line["Total"], CellValue::Number(dec("50.00")));
    }

    #[test]
    fn test_overflowing_total_is_a_fault() {
        let doc = InvoiceDocument::from_text_pages(
            "sofabex.pdf",
            ["1 N3005 N3005-B TENSOR CORREA GMB 9999 79228162514264337593543950,33"],
        );
        assert!(matches!(
            SofabexParser.attempt(&doc),
            Err(ExtractionError::Parse { .. })
        ));
    }

    #[test]
    fn test_skips_english_documents() {
        let doc = InvoiceDocument::from_text_pages(
            "en.pdf",
            ["ITEM PARTS NO QTY PRICE\n1 N3005 N3005-B BALL BEARING GMB 4 12,50"],
        );
        assert!(SofabexParser.attempt(&doc).unwrap().is_none());
    }
}

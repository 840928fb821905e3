//! Generic invoice parser driven by table headers.

use tracing::{debug, trace};

use crate::error::ExtractionError;
use crate::models::invoice::{InvoiceDocument, InvoiceLine, InvoiceTable, NUMERIC_COLUMNS};

use super::cells::{derive_total, numeric_cell, text_cell};
use super::chain::InvoiceParser;
use super::columns::{ColumnMapping, detect_columns, is_product_row, is_product_table};
use super::patterns::{CID_ARTEFACT, FRENCH_MERGED_LINE, WHITESPACE};

/// Parser that maps table headers to canonical columns in Spanish, French
/// or English, whatever the vendor layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalParser;

impl UniversalParser {
    pub fn new() -> Self {
        Self
    }

    fn mapped_line(mapping: &ColumnMapping, row: &[Option<String>]) -> InvoiceLine {
        let mut line = InvoiceLine::new();
        for (&index, column) in mapping {
            let Some(cell) = row.get(index) else {
                continue;
            };
            let value = if NUMERIC_COLUMNS.contains(&column.as_str()) {
                numeric_cell(cell.as_deref())
            } else {
                text_cell(cell.as_deref())
            };
            line.insert(column.clone(), value);
        }
        line
    }

    /// Parse a cell holding several product lines of a French invoice.
    fn merged_lines(cell: &str) -> Vec<InvoiceLine> {
        cell.lines()
            .filter_map(|raw| {
                let text = CID_ARTEFACT.replace_all(raw, " ");
                let text = WHITESPACE.replace_all(text.trim(), " ");
                let caps = FRENCH_MERGED_LINE.captures(&text)?;

                let mut line = InvoiceLine::new();
                line.insert("Line_Number".into(), text_cell(Some(&caps[1])));
                line.insert("Code".into(), text_cell(Some(&caps[2])));
                line.insert("Code_2".into(), text_cell(Some(&caps[3])));
                line.insert("Description".into(), text_cell(Some(&caps[4])));
                line.insert("Quantity".into(), numeric_cell(Some(&caps[5])));
                line.insert("Unit".into(), text_cell(Some(&caps[6])));
                line.insert("Unit_Price".into(), numeric_cell(Some(&caps[7])));
                line.insert("Amount_HT".into(), numeric_cell(Some(&caps[8])));
                Some(line)
            })
            .collect()
    }
}

impl InvoiceParser for UniversalParser {
    fn name(&self) -> &'static str {
        "universal"
    }

    fn attempt(&self, doc: &InvoiceDocument) -> Result<Option<InvoiceTable>, ExtractionError> {
        let mut table = InvoiceTable::new(self.name());

        for (page_index, page) in doc.pages.iter().enumerate() {
            for grid in &page.tables {
                let Some((headers, rows)) = grid.split_first() else {
                    continue;
                };

                let mapping = detect_columns(headers);
                if mapping.is_empty() || !is_product_table(&mapping) {
                    trace!("page {}: skipping non-product table", page_index + 1);
                    continue;
                }
                debug!(
                    "page {}: product table with columns {:?}",
                    page_index + 1,
                    mapping.values().collect::<Vec<_>>()
                );

                for row in rows {
                    let filled = row.iter().flatten().filter(|c| !c.is_empty()).count();

                    if filled > 1 {
                        if !is_product_row(row) {
                            continue;
                        }
                        let mut line = Self::mapped_line(&mapping, row);
                        if !line.is_empty() {
                            derive_total(&mut line);
                            table.push(line);
                        }
                    } else if let Some(Some(cell)) = row.first() {
                        if cell.contains('\n') {
                            for mut line in Self::merged_lines(cell) {
                                derive_total(&mut line);
                                table.push(line);
                            }
                        }
                    }
                }
            }
        }

        Ok(table.non_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::{CellGrid, CellValue, InvoicePage};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn grid(rows: &[&[&str]]) -> CellGrid {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                    .collect()
            })
            .collect()
    }

    fn document(tables: Vec<CellGrid>) -> InvoiceDocument {
        InvoiceDocument {
            source: "factura.pdf".to_string(),
            pages: vec![InvoicePage {
                text: String::new(),
                tables,
            }],
        }
    }

    #[test]
    fn test_header_mapped_table_with_derived_total() {
        let doc = document(vec![grid(&[
            &["Qty", "Description", "Unit Price"],
            &["2", "Widget", "3,50"],
            &["", "SUBTOTAL", "7,00"],
        ])]);
        let table = UniversalParser.attempt(&doc).unwrap().unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.columns, vec!["Quantity", "Description", "Unit_Price", "Total"]);
        let line = &table.rows[0];
        assert_eq!(line["Quantity"], CellValue::Number(dec("2")));
        assert_eq!(line["Description"], CellValue::from("Widget"));
        assert_eq!(line["Unit_Price"], CellValue::Number(dec("3.50")));
        assert_eq!(line["Total"], CellValue::Number(dec("7.00")));
    }

    #[test]
    fn test_non_product_tables_skipped() {
        let doc = document(vec![grid(&[
            &["Banco", "Cuenta"],
            &["BANCOLOMBIA", "123456"],
        ])]);
        assert!(UniversalParser.attempt(&doc).unwrap().is_none());
    }

    #[test]
    fn test_unmapped_headers_pass_through() {
        let doc = document(vec![grid(&[
            &["Código", "Peso  Neto", "Cantidad"],
            &["A-1", "2,5", "4"],
        ])]);
        let table = UniversalParser.attempt(&doc).unwrap().unwrap();
        assert_eq!(table.rows[0]["Peso Neto"], CellValue::from("2,5"));
        assert_eq!(table.rows[0]["Code"], CellValue::from("A-1"));
        assert!(!table.rows[0].contains_key("Total"));
    }

    #[test]
    fn test_merged_cell_french_lines() {
        let merged = "001 N300501 /N3005 POMPE N3005-BOITE 360,00 O 9,54 3 434,40\n\
                      002 K1(cid:160)/K1 FILTRE 2,00 O 5,00 10,00";
        let doc = InvoiceDocument {
            source: "facture.pdf".to_string(),
            pages: vec![InvoicePage {
                text: String::new(),
                tables: vec![vec![
                    vec![Some("Lg".into()), Some("Code".into()), Some("Libellé".into())],
                    vec![Some(merged.to_string()), None, None],
                ]],
            }],
        };
        let table = UniversalParser.attempt(&doc).unwrap().unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.rows[0];
        assert_eq!(first["Line_Number"], CellValue::from("001"));
        assert_eq!(first["Code"], CellValue::from("N300501"));
        assert_eq!(first["Code_2"], CellValue::from("N3005"));
        assert_eq!(first["Description"], CellValue::from("POMPE N3005-BOITE"));
        assert_eq!(first["Quantity"], CellValue::Number(dec("360")));
        assert_eq!(first["Unit"], CellValue::from("O"));
        assert_eq!(first["Unit_Price"], CellValue::Number(dec("9.54")));
        assert_eq!(first["Amount_HT"], CellValue::Number(dec("3434.40")));
        assert_eq!(first["Total"], CellValue::Number(dec("3434.40")));

        assert_eq!(table.rows[1]["Code"], CellValue::from("K1"));
        assert_eq!(table.rows[1]["Total"], CellValue::Number(dec("10.00")));
    }
}

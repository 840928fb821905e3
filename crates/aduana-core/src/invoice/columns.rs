//! Multilingual table header normalization and row filtering for the
//! generic invoice parser.

use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;

use super::patterns::WHITESPACE;

/// Header synonyms (lower-case, periods removed) and their canonical column.
pub const COLUMN_MAPPINGS: &[(&str, &str)] = &[
    // Spanish
    ("l/n", "Line_Number"),
    ("línea", "Line_Number"),
    ("linea", "Line_Number"),
    ("ln", "Line_Number"),
    ("codigo", "Code"),
    ("código", "Code"),
    ("code", "Code"),
    ("codigo 2", "Code_2"),
    ("código 2", "Code_2"),
    ("codigo2", "Code_2"),
    ("descripcion", "Description"),
    ("descripción", "Description"),
    ("marca", "Brand"),
    ("cantidad", "Quantity"),
    ("precio", "Price"),
    ("precio unitario", "Unit_Price"),
    // French
    ("lg", "Line_Number"),
    ("ligne", "Line_Number"),
    ("code article", "Code"),
    ("article", "Code_2"),
    ("libellé", "Description"),
    ("libelle", "Description"),
    ("qté", "Quantity"),
    ("qte", "Quantity"),
    ("quantité", "Quantity"),
    ("unité", "Unit"),
    ("unite", "Unit"),
    ("prix unit", "Unit_Price"),
    ("prix unitaire", "Unit_Price"),
    ("c/m", "CM"),
    ("montant ht", "Amount_HT"),
    ("montant", "Amount"),
    // English
    ("item", "Line_Number"),
    ("parts no", "Code"),
    ("part no", "Code"),
    ("supply code", "Code_2"),
    ("description", "Description"),
    ("qty", "Quantity"),
    ("quantity", "Quantity"),
    ("price", "Unit_Price"),
    ("unit price", "Unit_Price"),
    ("total", "Total"),
    ("brand", "Brand"),
    ("order no", "Order_Number"),
];

/// A table is a product table when it maps at least one of these.
pub const REQUIRED_COLUMNS: &[&str] = &["Code", "Description", "Quantity", "Price", "Unit_Price"];

/// Rows mentioning any of these are totals, taxes or page furniture.
pub const ROW_BLACKLIST: &[&str] = &[
    "total",
    "subtotal",
    "sub-total",
    "grand total",
    "tva",
    "iva",
    "tax",
    "vat",
    "page",
    "página",
    "pagina",
    "facture",
    "factura",
    "invoice",
    "conditions",
    "condiciones",
    "terms",
    "transporteur",
    "transporte",
    "shipping",
];

lazy_static! {
    static ref MAPPINGS: HashMap<&'static str, &'static str> =
        COLUMN_MAPPINGS.iter().copied().collect();
}

/// Column index to canonical column name, for one table.
pub type ColumnMapping = BTreeMap<usize, String>;

/// Lookup key for a header: lower-cased, whitespace collapsed, periods
/// removed.
pub fn normalize_header(header: &str) -> String {
    WHITESPACE
        .replace_all(header.trim(), " ")
        .to_lowercase()
        .replace('.', "")
}

/// Canonical name of a header. Unmapped headers pass through trimmed with
/// whitespace collapsed.
pub fn canonical_column(header: &str) -> String {
    match MAPPINGS.get(normalize_header(header).as_str()) {
        Some(canonical) => canonical.to_string(),
        None => WHITESPACE.replace_all(header.trim(), " ").into_owned(),
    }
}

/// Map every non-blank header cell to its canonical column name.
pub fn detect_columns(headers: &[Option<String>]) -> ColumnMapping {
    headers
        .iter()
        .enumerate()
        .filter_map(|(i, header)| {
            let header = header.as_deref()?.trim();
            if header.is_empty() {
                None
            } else {
                Some((i, canonical_column(header)))
            }
        })
        .collect()
}

/// Whether the mapped columns describe product line items.
pub fn is_product_table(mapping: &ColumnMapping) -> bool {
    mapping
        .values()
        .any(|column| REQUIRED_COLUMNS.contains(&column.as_str()))
}

/// Whether a data row is a product line: it mentions no blacklisted keyword
/// and has at least one numeric cell.
pub fn is_product_row(row: &[Option<String>]) -> bool {
    let text = row
        .iter()
        .map(|cell| cell.as_deref().unwrap_or("").to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    if ROW_BLACKLIST.iter().any(|word| text.contains(word)) {
        return false;
    }

    row.iter().flatten().any(|cell| is_numeric_token(cell))
}

fn is_numeric_token(cell: &str) -> bool {
    let digits: String = cell
        .chars()
        .filter(|c| !matches!(c, ',' | '.' | ' '))
        .collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
            .collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Prix   Unit. "), "prix unit");
        assert_eq!(normalize_header("PARTS NO."), "parts no");
    }

    #[test]
    fn test_canonical_columns_multilingual() {
        assert_eq!(canonical_column("Qté"), "Quantity");
        assert_eq!(canonical_column("Cantidad"), "Quantity");
        assert_eq!(canonical_column("Unit Price"), "Unit_Price");
        assert_eq!(canonical_column("Montant HT"), "Amount_HT");
        assert_eq!(canonical_column("Libellé"), "Description");
        assert_eq!(canonical_column("  Peso   Neto "), "Peso Neto");
    }

    #[test]
    fn test_detect_columns_skips_blank_headers() {
        let mapping = detect_columns(&cells(&["Qty", "", "Description"]));
        let expected: ColumnMapping = [(0, "Quantity".to_string()), (2, "Description".to_string())]
            .into_iter()
            .collect();
        assert_eq!(mapping, expected);
    }

    #[test]
    fn test_product_table_requires_key_column() {
        assert!(is_product_table(&detect_columns(&cells(&["Lg", "Code Article"]))));
        assert!(!is_product_table(&detect_columns(&cells(&["Banco", "Cuenta"]))));
    }

    #[test]
    fn test_product_rows() {
        assert!(is_product_row(&cells(&["2", "Widget", "3,50"])));
        assert!(is_product_row(&cells(&["", "Bomba", "1 234,50"])));
        assert!(!is_product_row(&cells(&["", "SUBTOTAL", "7,00"])));
        assert!(!is_product_row(&cells(&["", "IVA 19%", "1,33"])));
        assert!(!is_product_row(&cells(&["A1", "Widget", "n/a"])));
    }
}

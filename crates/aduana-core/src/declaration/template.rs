//! Declaration header rows filled positionally against a header template.

use serde::Serialize;

use crate::models::record::DeclarationBlock;

/// Template columns renamed in the output table.
pub const COLUMN_RENAMES: &[(&str, &str)] = &[
    ("Columna68", "COD_PAIS_COMPRA"),
    ("Columna69", "PESO_BRUTO"),
    ("Columna70", "DMS_PESO_BRUTO_KG"),
    ("Columna71", "PESO_NETO_KG"),
    ("Columna72", "DMS_PESO_NETO_KG"),
    ("Columna73", "CODIGO_EMBALAJE"),
    ("Columna74", "NUMERO_BULTOS"),
    ("Columna75", "SUBPARTIDAS"),
    ("Columna76", "COD_UNIDAD_CAL"),
    ("Columna77", "CANTIDAD"),
    ("Columna78", "DMS_CANTIDAD"),
    ("Columna79", "VALOR FOB USD"),
    ("Columna80", "VALOR FLETES USD"),
    ("Columna81", "VALOR_SEGUROS_USD"),
    ("Columna82", "VALOR_OTROS_GASTOS"),
    ("Columna83", "SUMATORIA_FLETES_SEGUROS_OTROS_USD"),
    ("Columna84", "AJUSTE_VALOR_USD"),
    ("Columna85", "VALOR_ADUANA_USD"),
    ("Columna88", "COD_OFICINA"),
];

/// Output name of a template column.
pub fn rename_column(header: &str) -> &str {
    COLUMN_RENAMES
        .iter()
        .find(|(from, _)| *from == header)
        .map(|(_, to)| *to)
        .unwrap_or(header)
}

/// Fill `headers` positionally with the block's non-empty lines.
///
/// Lines are trimmed and their commas replaced by periods. Headers beyond
/// the last line get `None`; lines beyond the last header are ignored.
pub fn fill_template(block: &DeclarationBlock, headers: &[String]) -> Vec<Option<String>> {
    let mut lines = block
        .raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.replace(',', "."));

    headers.iter().map(|_| lines.next()).collect()
}

/// Declaration rows of one or more documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeclarationTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl DeclarationTable {
    /// Fill the template for every block, drop columns that are empty in
    /// every row and apply [`COLUMN_RENAMES`].
    pub fn from_blocks(blocks: &[DeclarationBlock], headers: &[String]) -> Self {
        let filled: Vec<Vec<Option<String>>> = blocks
            .iter()
            .map(|block| fill_template(block, headers))
            .collect();

        let keep: Vec<usize> = (0..headers.len())
            .filter(|&i| filled.iter().any(|row| row[i].is_some()))
            .collect();

        Self {
            columns: keep
                .iter()
                .map(|&i| rename_column(&headers[i]).to_string())
                .collect(),
            rows: filled
                .into_iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Append the rows of another table, widening the column set.
    pub fn extend(&mut self, other: DeclarationTable) {
        let positions: Vec<usize> = other
            .columns
            .iter()
            .map(|column| match self.columns.iter().position(|c| c == column) {
                Some(i) => i,
                None => {
                    self.columns.push(column.clone());
                    for row in &mut self.rows {
                        row.push(None);
                    }
                    self.columns.len() - 1
                }
            })
            .collect();

        for row in other.rows {
            let mut widened = vec![None; self.columns.len()];
            for (value, &i) in row.into_iter().zip(&positions) {
                widened[i] = value;
            }
            self.rows.push(widened);
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn block(number: u32, text: &str) -> DeclarationBlock {
        DeclarationBlock {
            declaration_number: number,
            raw_text: text.to_string(),
        }
    }

    #[test]
    fn test_fill_template_positional() {
        let row = fill_template(
            &block(1, "DECLARACION 1 DE 2024\n\n  900,123  \nBOGOTA"),
            &headers(&["A", "B", "C", "D"]),
        );
        assert_eq!(
            row,
            vec![
                Some("DECLARACION 1 DE 2024".to_string()),
                Some("900.123".to_string()),
                Some("BOGOTA".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_table_drops_empty_columns_and_renames() {
        let table = DeclarationTable::from_blocks(
            &[block(1, "X\n10,5"), block(2, "Y")],
            &headers(&["Titulo", "Columna79", "Columna80"]),
        );
        assert_eq!(table.columns, vec!["Titulo", "VALOR FOB USD"]);
        assert_eq!(
            table.rows,
            vec![
                vec![Some("X".to_string()), Some("10.5".to_string())],
                vec![Some("Y".to_string()), None],
            ]
        );
    }

    #[test]
    fn test_extend_widens_columns() {
        let mut table =
            DeclarationTable::from_blocks(&[block(1, "X")], &headers(&["Titulo", "Columna88"]));
        let other = DeclarationTable::from_blocks(
            &[block(2, "Y\n01")],
            &headers(&["Titulo", "Columna88"]),
        );
        table.extend(other);

        assert_eq!(table.columns, vec!["Titulo", "COD_OFICINA"]);
        assert_eq!(table.rows[0], vec![Some("X".to_string()), None]);
        assert_eq!(
            table.rows[1],
            vec![Some("Y".to_string()), Some("01".to_string())]
        );
    }

    #[test]
    fn test_rename_leaves_unknown_columns() {
        assert_eq!(rename_column("Columna68"), "COD_PAIS_COMPRA");
        assert_eq!(rename_column("Columna1"), "Columna1");
    }
}

//! Tabular shaping of product records.

use indexmap::IndexMap;
use serde::Serialize;

use crate::models::record::ProductRecord;

/// Columns always present, in this order, ahead of every other column.
pub const CORE_COLUMNS: &[&str] = &[
    "Archivo",
    "Declaracion",
    "Producto",
    "Cantidad",
    "Unidad",
    "Referencia",
    "Marca",
    "Modelo",
    "Serial",
    "Pais_Origen",
];

/// Product records laid out as rows over a shared column set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ProductTable {
    /// Build the table from records.
    ///
    /// Columns are the core columns followed by every other field name seen,
    /// alphabetically. With `drop_empty_columns`, non-core columns that are
    /// blank in every row are removed. Missing values are empty strings.
    pub fn from_records(records: &[ProductRecord], drop_empty_columns: bool) -> Self {
        let mut extra: Vec<String> = Vec::new();
        for record in records {
            for field in record.fields.keys() {
                let name = field.as_str();
                if !CORE_COLUMNS.contains(&name) && !extra.iter().any(|c| c == name) {
                    extra.push(name.to_string());
                }
            }
        }
        extra.sort();

        if drop_empty_columns {
            extra.retain(|column| {
                records
                    .iter()
                    .any(|r| r.column(column).is_some_and(|v| !v.trim().is_empty()))
            });
        }

        let columns: Vec<String> = CORE_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(extra)
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.column(column).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Rows as column-name to value maps, in column order.
    pub fn row_maps(&self) -> Vec<IndexMap<&str, &str>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

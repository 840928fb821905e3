//! Invoice-side data: the document hand-off from the PDF layer and the
//! line-item tables produced by the parser chain.

use std::fmt;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A table as extracted from a PDF page: rows of optional cell strings.
pub type CellGrid = Vec<Vec<Option<String>>>;

/// One invoice document as handed over by the PDF extraction layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    /// Name of the source file.
    #[serde(default)]
    pub source: String,

    /// Pages in document order.
    #[serde(default)]
    pub pages: Vec<InvoicePage>,
}

/// Extracted content of a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoicePage {
    /// Page text, one visual line per text line.
    #[serde(default)]
    pub text: String,

    /// Detected tables on this page.
    #[serde(default)]
    pub tables: Vec<CellGrid>,
}

impl InvoiceDocument {
    /// Build a document from page texts only.
    pub fn from_text_pages<I, S>(source: impl Into<String>, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: source.into(),
            pages: pages
                .into_iter()
                .map(|text| InvoicePage {
                    text: text.into(),
                    tables: Vec::new(),
                })
                .collect(),
        }
    }

    /// Full text of all pages, each page terminated by a newline.
    pub fn full_text(&self) -> String {
        let mut text = String::new();
        for page in &self.pages {
            text.push_str(&page.text);
            text.push('\n');
        }
        text
    }

    /// All text lines across pages, trimmed, in document order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|p| p.text.lines())
            .map(str::trim)
    }
}

/// Typed value of an invoice cell.
///
/// Serialized untagged and never read back: a number and a numeric-looking
/// text cell serialize alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Parsed numeric value (quantity, price, amount).
    Number(Decimal),
    /// Raw text value.
    Text(String),
    /// Missing or unparseable value.
    Empty,
}

impl CellValue {
    /// Numeric value, if any.
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether the cell carries no value.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n.normalize()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<Decimal> for CellValue {
    fn from(n: Decimal) -> Self {
        CellValue::Number(n)
    }
}

impl From<Option<Decimal>> for CellValue {
    fn from(n: Option<Decimal>) -> Self {
        n.map(CellValue::Number).unwrap_or(CellValue::Empty)
    }
}

/// One invoice line item: canonical column name to typed value.
pub type InvoiceLine = IndexMap<String, CellValue>;

/// Columns that carry numbers and are parsed with the locale parser.
pub const NUMERIC_COLUMNS: &[&str] = &[
    "Quantity",
    "Unit_Price",
    "Price",
    "Total",
    "Amount_HT",
    "Amount",
];

/// Line items produced by one invoice parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceTable {
    /// Name of the parser that produced the table.
    pub parser: String,

    /// Column names in first-seen order.
    pub columns: Vec<String>,

    /// Line items.
    pub rows: Vec<InvoiceLine>,
}

impl InvoiceTable {
    /// Create an empty table for the given parser.
    pub fn new(parser: impl Into<String>) -> Self {
        Self {
            parser: parser.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a line, registering any new columns.
    pub fn push(&mut self, line: InvoiceLine) {
        for key in line.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(line);
    }

    /// Number of line items.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no line items.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert to `Some(self)` when non-empty.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }

    /// Sum of the `Total` column, treating missing values as zero.
    pub fn total(&self) -> Decimal {
        self.rows
            .iter()
            .filter_map(|r| r.get("Total").and_then(CellValue::as_number))
            .sum()
    }
}

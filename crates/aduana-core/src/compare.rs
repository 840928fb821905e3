//! Invoice against declaration quantity reconciliation.
//!
//! Invoice lines and declared products are grouped by a normalized reference,
//! quantities are summed per side, and each reference gets a status telling
//! whether the invoice bills more or less than was declared.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::models::invoice::{CellValue, InvoiceLine};
use crate::models::record::{Field, ProductRecord};
use crate::text::parse_locale_decimal;

/// Reference used for lines and products that carry none.
pub const NO_REFERENCE: &str = "S/R";

/// Invoice column holding the product reference.
pub const INVOICE_REFERENCE_COLUMN: &str = "Code";

/// Normalize a reference for matching: trimmed, upper-case, and cut at the
/// first `/`. Blank references become [`NO_REFERENCE`].
pub fn normalize_reference(raw: Option<&str>) -> String {
    let normalized = raw
        .map(|r| r.trim().to_uppercase())
        .map(|r| match r.split_once('/') {
            Some((head, _)) => head.trim().to_string(),
            None => r,
        })
        .unwrap_or_default();

    if normalized.is_empty() {
        NO_REFERENCE.to_string()
    } else {
        normalized
    }
}

/// Outcome of comparing one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// Invoiced and declared quantities agree.
    Ok,
    /// Invoiced but never declared.
    NotDeclared,
    /// The invoice bills this many units more than declared.
    InvoiceSurplus(Decimal),
    /// The invoice bills this many units less than declared.
    InvoiceShortfall(Decimal),
}

impl MatchStatus {
    fn from_quantities(invoiced: Decimal, declared: Decimal) -> Self {
        let difference = invoiced.saturating_sub(declared);
        if difference.is_zero() {
            MatchStatus::Ok
        } else if declared.is_zero() {
            MatchStatus::NotDeclared
        } else if difference.is_sign_positive() {
            MatchStatus::InvoiceSurplus(difference)
        } else {
            MatchStatus::InvoiceShortfall(difference.abs())
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, MatchStatus::Ok)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Ok => f.write_str("OK"),
            MatchStatus::NotDeclared => f.write_str("No en Decl"),
            MatchStatus::InvoiceSurplus(n) => write!(f, "Sobra Fact ({})", n.round().normalize()),
            MatchStatus::InvoiceShortfall(n) => {
                write!(f, "Falta Fact ({})", n.round().normalize())
            }
        }
    }
}

impl Serialize for MatchStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One reference in the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    /// Normalized reference.
    #[serde(rename = "Referencia")]
    pub reference: String,
    /// First invoice description seen for the reference.
    #[serde(rename = "Description")]
    pub description: Option<String>,
    /// Summed invoice quantity.
    #[serde(rename = "Cant_Fact")]
    pub invoice_quantity: Decimal,
    /// Summed declared quantity.
    #[serde(rename = "Cant_Decl")]
    pub declared_quantity: Decimal,
    /// Invoice quantity minus declared quantity.
    #[serde(rename = "Diff_Cant")]
    pub difference: Decimal,
    /// Summed invoice line totals.
    #[serde(rename = "Valor_Total")]
    pub invoice_total: Decimal,
    #[serde(rename = "Estado")]
    pub status: MatchStatus,
}

/// Output column names, in row order.
pub const COMPARISON_COLUMNS: &[&str] = &[
    "Referencia",
    "Description",
    "Cant_Fact",
    "Cant_Decl",
    "Diff_Cant",
    "Valor_Total",
    "Estado",
];

impl ComparisonRow {
    /// Cell texts in [`COMPARISON_COLUMNS`] order.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.reference.clone(),
            self.description.clone().unwrap_or_default(),
            self.invoice_quantity.normalize().to_string(),
            self.declared_quantity.normalize().to_string(),
            self.difference.normalize().to_string(),
            self.invoice_total.normalize().to_string(),
            self.status.to_string(),
        ]
    }
}

#[derive(Debug, Default)]
struct Totals {
    description: Option<String>,
    invoiced: Decimal,
    declared: Decimal,
    value: Decimal,
}

/// Compare invoice lines with declared products, one row per reference in
/// reference order. Missing or unparseable quantities count as zero.
pub fn compare(lines: &[InvoiceLine], products: &[ProductRecord]) -> Vec<ComparisonRow> {
    let mut totals: BTreeMap<String, Totals> = BTreeMap::new();

    for line in lines {
        let reference = match line.get(INVOICE_REFERENCE_COLUMN) {
            Some(CellValue::Text(code)) => normalize_reference(Some(code.as_str())),
            Some(CellValue::Number(code)) => normalize_reference(Some(code.to_string().as_str())),
            _ => normalize_reference(None),
        };
        let number = |name: &str| {
            line.get(name)
                .and_then(CellValue::as_number)
                .unwrap_or_default()
        };

        let entry = totals.entry(reference).or_default();
        entry.invoiced = entry.invoiced.saturating_add(number("Quantity"));
        entry.value = entry.value.saturating_add(number("Total"));
        if entry.description.is_none() {
            if let Some(CellValue::Text(description)) = line.get("Description") {
                entry.description = Some(description.clone());
            }
        }
    }

    for product in products {
        let reference = normalize_reference(product.get(&Field::Referencia));
        let quantity = product
            .get(&Field::Cantidad)
            .and_then(parse_locale_decimal)
            .unwrap_or_default();

        let entry = totals.entry(reference).or_default();
        entry.declared = entry.declared.saturating_add(quantity);
    }

    debug!(
        "comparing {} invoice lines and {} products over {} references",
        lines.len(),
        products.len(),
        totals.len()
    );

    totals
        .into_iter()
        .map(|(reference, t)| ComparisonRow {
            reference,
            description: t.description,
            invoice_quantity: t.invoiced,
            declared_quantity: t.declared,
            difference: t.invoiced.saturating_sub(t.declared),
            invoice_total: t.value,
            status: MatchStatus::from_quantities(t.invoiced, t.declared),
        })
        .collect()
}

//! Generic `LABEL: value` extraction from a product block.

use tracing::trace;

use crate::models::config::DeclarationConfig;
use crate::models::record::{Field, FieldRecord};

use super::fields::{is_known_label, normalize_field_name};
use super::patterns::{CONTINUATION_SUFFIX, LABEL, LABEL_WORD, NUMERIC_TAIL};

const PREFIX_TRIM: &[char] = &[' ', ',', '.', ';', ':', '-', '\n', '\r', '\t'];
const VALUE_TRIM: &[char] = &[' ', ',', '.', ';', ':', '\n', '\r', '\t'];

/// A label located in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpan {
    /// Label text without the colon.
    pub label: String,
    /// Byte offset where the label starts.
    pub start: usize,
    /// Byte offset just past the colon; the value starts here.
    pub end: usize,
}

/// Locate every label in `text`, in order.
///
/// A candidate such as `ACME REFERENCIA:` is re-anchored at its longest
/// known-label suffix, so the leading words stay with the preceding value.
pub fn find_labels(text: &str) -> Vec<LabelSpan> {
    LABEL
        .captures_iter(text)
        .filter_map(|caps| {
            let candidate = caps.get(1)?;
            let whole = caps.get(0)?;
            let start = anchor_known_suffix(candidate.as_str())
                .map(|offset| candidate.start() + offset)
                .unwrap_or(candidate.start());

            Some(LabelSpan {
                label: text[start..candidate.end()].trim().to_string(),
                start,
                end: whole.end(),
            })
        })
        .collect()
}

/// Offset of the longest suffix of `candidate` (on a word boundary) that is
/// a known label, when that suffix is shorter than the candidate.
fn anchor_known_suffix(candidate: &str) -> Option<usize> {
    if is_known_label(candidate) {
        return None;
    }
    LABEL_WORD
        .find_iter(candidate)
        .skip(1)
        .map(|word| word.start())
        .find(|&offset| is_known_label(&candidate[offset..]))
}

/// Remove a trailing `, 1.234.567,89`-style numeric run.
pub fn trim_numeric_tail(s: &str) -> &str {
    match NUMERIC_TAIL.find(s) {
        Some(m) => &s[..m.start()],
        None => s,
    }
}

/// Label-driven field extractor.
#[derive(Debug, Clone)]
pub struct LabelExtractor {
    min_product_len: usize,
    max_value_len: usize,
}

impl LabelExtractor {
    /// Create an extractor with default limits.
    pub fn new() -> Self {
        Self::from_config(&DeclarationConfig::default())
    }

    /// Create an extractor from declaration configuration.
    pub fn from_config(config: &DeclarationConfig) -> Self {
        Self {
            min_product_len: config.min_product_len,
            max_value_len: config.max_value_len,
        }
    }

    /// Extract every field of a block.
    ///
    /// The text before the first label becomes `Producto`; each label's value
    /// runs up to the next label or the end of the block. The resulting
    /// record lists `Producto` first and then fields in label order.
    pub fn extract(&self, block: &str) -> FieldRecord {
        let block = block.trim();
        let mut fields = FieldRecord::new();
        let labels = find_labels(block);

        let prefix_end = labels.first().map(|l| l.start).unwrap_or(block.len());
        if let Some(product) = self.product_prefix(&block[..prefix_end]) {
            fields.insert(Field::Producto, product);
        }

        for (i, span) in labels.iter().enumerate() {
            let value_end = labels.get(i + 1).map(|next| next.start).unwrap_or(block.len());
            let raw = &block[span.end..value_end];

            if raw.len() > self.max_value_len {
                trace!("skipping oversized value for label {}", span.label);
                continue;
            }

            let Some(value) = clean_value(raw) else {
                continue;
            };

            let field = normalize_field_name(&span.label);
            if field == Field::Producto && fields.contains_key(&Field::Producto) {
                continue;
            }
            fields.insert(field, value);
        }

        fields
    }

    fn product_prefix(&self, prefix: &str) -> Option<String> {
        let product = prefix.trim_matches(PREFIX_TRIM);
        let product = trim_numeric_tail(product).trim_matches(PREFIX_TRIM);

        if product.chars().count() >= self.min_product_len.max(1) {
            Some(product.to_string())
        } else {
            None
        }
    }
}

impl Default for LabelExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim punctuation and drop any `//` continuation suffix.
fn clean_value(raw: &str) -> Option<String> {
    let value = raw.trim_matches(VALUE_TRIM);
    let value = CONTINUATION_SUFFIX.replace(value, "");
    let value = value.trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

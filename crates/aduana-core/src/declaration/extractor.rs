//! Product extraction over a whole declaration document.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::DeclarationConfig;
use crate::models::record::{DeclarationBlock, ProductRecord};
use crate::text::clean_declaration_text;

use super::labels::LabelExtractor;
use super::products::{product_section, split_products};
use super::quantity::disambiguate;
use super::segmenter::DeclarationSegmenter;
use super::values::normalize_values;

/// Outcome of extracting one document.
#[derive(Debug, Clone, Serialize)]
pub struct ProductExtraction {
    /// Valid product records, grouped by declaration in ascending order.
    pub records: Vec<ProductRecord>,
    /// Declaration blocks the document was split into.
    pub declarations: Vec<DeclarationBlock>,
    /// Product blocks dropped for lack of a `Producto` value.
    pub dropped_blocks: usize,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Extracts product records from customs declaration text.
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    segmenter: DeclarationSegmenter,
    labels: LabelExtractor,
    strip_continuations: bool,
}

impl ProductExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&DeclarationConfig::default())
    }

    /// Create an extractor from declaration configuration.
    pub fn from_config(config: &DeclarationConfig) -> Self {
        Self {
            segmenter: DeclarationSegmenter::new(&config.terminal_delimiter),
            labels: LabelExtractor::from_config(config),
            strip_continuations: config.strip_continuation_blocks,
        }
    }

    /// Extract every product of a document.
    ///
    /// `source` names the document in the `Archivo` column.
    pub fn extract(&self, text: &str, source: &str) -> ProductExtraction {
        let start = Instant::now();
        let mut warnings = Vec::new();

        let cleaned = clean_declaration_text(text, self.strip_continuations);
        let declarations = self.segmenter.segment(&cleaned);
        if declarations.is_empty() {
            warnings.push("Document contains no text".to_string());
        }

        let mut records = Vec::new();
        let mut dropped_blocks = 0;

        for block in &declarations {
            let Some(section) = product_section(&block.raw_text) else {
                debug!(
                    "declaration {} has no product section",
                    block.declaration_number
                );
                warnings.push(format!(
                    "Declaration {} has no product section",
                    block.declaration_number
                ));
                continue;
            };

            let products = split_products(section);
            debug!(
                "declaration {}: {} product blocks",
                block.declaration_number,
                products.len()
            );

            for product in products {
                let mut fields = self.labels.extract(&product);
                disambiguate(&mut fields);
                normalize_values(&mut fields);

                match ProductRecord::new(source, block.declaration_number.to_string(), fields) {
                    Some(record) => records.push(record),
                    None => dropped_blocks += 1,
                }
            }
        }

        info!(
            "{}: {} declarations, {} products, {} blocks dropped",
            source,
            declarations.len(),
            records.len(),
            dropped_blocks
        );

        ProductExtraction {
            records,
            declarations,
            dropped_blocks,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for ProductExtractor {
    fn default() -> Self {
        Self::new()
    }
}

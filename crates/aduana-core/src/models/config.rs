//! Configuration structures for the extraction pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AduanaError, Result};

/// Main configuration for the aduana pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AduanaConfig {
    /// Declaration and product extraction configuration.
    pub declarations: DeclarationConfig,

    /// Invoice parser chain configuration.
    pub invoices: InvoiceConfig,

    /// Tabular output configuration.
    pub output: OutputConfig,
}

/// Declaration and product extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclarationConfig {
    /// Marker that, alone on a line, terminates a declaration block.
    pub terminal_delimiter: String,

    /// Minimum length of the implicit `Producto` prefix.
    pub min_product_len: usize,

    /// Labeled values longer than this are ignored.
    pub max_value_len: usize,

    /// Remove non-fillable continuation regions and inline `<< DO >>` markers.
    pub strip_continuation_blocks: bool,
}

impl Default for DeclarationConfig {
    fn default() -> Self {
        Self {
            terminal_delimiter: "DO  LAC".to_string(),
            min_product_len: 3,
            max_value_len: 1000,
            strip_continuation_blocks: true,
        }
    }
}

/// Known invoice parsers, in the order they can be chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserKind {
    /// Fixed layout: `<qty> EA <description> <product no> ...` lines.
    Gate,
    /// Fixed layout: Spanish numbered lines ending in quantity and price.
    Sofabex,
    /// Fixed layout: multi-line blocks closed by brand, quantity and price.
    Adk,
    /// Header-mapped generic table parser.
    Universal,
}

/// Invoice parser chain configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    /// Parsers to try, in priority order.
    pub parsers: Vec<ParserKind>,

    /// Brand codes that close a product block in the ADK layout.
    pub adk_brands: Vec<String>,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            parsers: vec![
                ParserKind::Gate,
                ParserKind::Sofabex,
                ParserKind::Adk,
                ParserKind::Universal,
            ],
            adk_brands: ["GMB", "NSK", "KOYO", "SKF", "FAG"]
                .iter()
                .map(|b| b.to_string())
                .collect(),
        }
    }
}

/// Tabular output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Drop non-core product columns that are empty in every row.
    pub drop_empty_columns: bool,

    /// Header template used to fill declaration rows.
    pub template: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            drop_empty_columns: true,
            template: None,
        }
    }
}

impl AduanaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde alone cannot constrain.
    pub fn validate(&self) -> Result<()> {
        if self.declarations.terminal_delimiter.trim().is_empty() {
            return Err(AduanaError::Config(
                "declarations.terminal_delimiter must not be empty".to_string(),
            ));
        }
        if self.invoices.parsers.is_empty() {
            return Err(AduanaError::Config(
                "invoices.parsers must list at least one parser".to_string(),
            ));
        }
        if self.invoices.adk_brands.iter().any(|b| b.trim().is_empty()) {
            return Err(AduanaError::Config(
                "invoices.adk_brands must not contain blank entries".to_string(),
            ));
        }
        Ok(())
    }
}

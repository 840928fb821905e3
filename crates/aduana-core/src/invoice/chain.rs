//! Ordered invoice parser chain: first non-empty result wins.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::{InvoiceConfig, ParserKind};
use crate::models::invoice::{InvoiceDocument, InvoiceTable};

use super::adk::AdkParser;
use super::gate::GateParser;
use super::sofabex::SofabexParser;
use super::universal::UniversalParser;

/// One strategy for turning an invoice document into line items.
pub trait InvoiceParser {
    /// Short parser name, reported as the winner of the chain.
    fn name(&self) -> &'static str;

    /// Try to parse the document.
    ///
    /// `Ok(None)` means the layout does not apply; `Err` is a fault inside
    /// the parser, which the chain records before moving on.
    fn attempt(&self, doc: &InvoiceDocument) -> Result<Option<InvoiceTable>, ExtractionError>;
}

/// A parser that failed on a document.
#[derive(Debug)]
pub struct ParserFailure {
    pub parser: &'static str,
    pub error: ExtractionError,
}

/// Result of running the chain on one document.
#[derive(Debug, Default)]
pub struct ChainOutcome {
    /// Lines of the winning parser, or `None` when nothing applied.
    pub table: Option<InvoiceTable>,
    /// Name of the winning parser.
    pub winner: Option<&'static str>,
    /// Parsers that raised a fault before the winner was found.
    pub failures: Vec<ParserFailure>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ChainOutcome {
    /// Whether no parser produced any line.
    pub fn is_empty(&self) -> bool {
        self.table.as_ref().is_none_or(InvoiceTable::is_empty)
    }
}

/// Parsers tried in priority order.
pub struct ParserChain {
    parsers: Vec<Box<dyn InvoiceParser>>,
}

impl ParserChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Build the chain described by the configuration.
    pub fn from_config(config: &InvoiceConfig) -> Self {
        config
            .parsers
            .iter()
            .fold(Self::new(), |chain, kind| match kind {
                ParserKind::Gate => chain.with_parser(GateParser::new()),
                ParserKind::Sofabex => chain.with_parser(SofabexParser::new()),
                ParserKind::Adk => chain.with_parser(AdkParser::with_brands(&config.adk_brands)),
                ParserKind::Universal => chain.with_parser(UniversalParser::new()),
            })
    }

    /// Append a parser with the lowest priority so far.
    pub fn with_parser<P: InvoiceParser + 'static>(mut self, parser: P) -> Self {
        self.parsers.push(Box::new(parser));
        self
    }

    /// Names of the parsers in priority order.
    pub fn parser_names(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }

    /// Run the parsers in order and return the first non-empty table.
    ///
    /// A parser fault is logged and recorded, never propagated. When no
    /// parser applies the outcome is empty.
    pub fn parse(&self, doc: &InvoiceDocument) -> ChainOutcome {
        let start = Instant::now();
        let mut outcome = ChainOutcome::default();

        for parser in &self.parsers {
            debug!("{}: trying {} parser", doc.source, parser.name());

            match parser.attempt(doc) {
                Ok(Some(table)) if !table.is_empty() => {
                    info!(
                        "{}: {} lines parsed by {}",
                        doc.source,
                        table.len(),
                        parser.name()
                    );
                    outcome.winner = Some(parser.name());
                    outcome.table = Some(table);
                    break;
                }
                Ok(_) => {}
                Err(error) => {
                    warn!("{}: {} parser failed: {}", doc.source, parser.name(), error);
                    outcome.failures.push(ParserFailure {
                        parser: parser.name(),
                        error,
                    });
                }
            }
        }

        if outcome.table.is_none() {
            info!("{}: no invoice parser applied", doc.source);
        }

        outcome.processing_time_ms = start.elapsed().as_millis() as u64;
        outcome
    }
}

impl Default for ParserChain {
    fn default() -> Self {
        Self::from_config(&InvoiceConfig::default())
    }
}

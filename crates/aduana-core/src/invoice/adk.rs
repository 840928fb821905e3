//! Fixed-layout parser for ADK invoices, whose line items span several
//! text lines.

use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::error::ExtractionError;
use crate::models::invoice::{InvoiceDocument, InvoiceLine, InvoiceTable};

use super::cells::{line_total, required_number, text_cell};
use super::chain::InvoiceParser;
use super::patterns::{ADK_BLOCK_START, ADK_CODE};

/// Default brands that close an ADK product block.
pub const DEFAULT_BRANDS: &[&str] = &["GMB", "NSK", "KOYO", "SKF", "FAG"];

/// Block accumulation state.
#[derive(Debug, Default)]
enum BlockState {
    #[default]
    Idle,
    Collecting(Vec<String>),
}

/// Parser for blocks opened by `<item> <code>` and closed by a line holding
/// `<BRAND> <qty> <price,dd>`.
#[derive(Debug, Clone)]
pub struct AdkParser {
    block_end: Option<Regex>,
}

impl AdkParser {
    /// Create a parser closing blocks on the default brands.
    pub fn new() -> Self {
        Self::with_brands(DEFAULT_BRANDS)
    }

    /// Create a parser closing blocks on the given brands.
    pub fn with_brands<S: AsRef<str>>(brands: &[S]) -> Self {
        let alternatives: Vec<String> = brands
            .iter()
            .map(|b| b.as_ref().trim())
            .filter(|b| !b.is_empty())
            .map(regex::escape)
            .collect();

        let block_end = if alternatives.is_empty() {
            None
        } else {
            Regex::new(&format!(
                r"\b(?P<brand>{})\s+(?P<quantity>\d+)\s+(?P<price>\d+,\d+)",
                alternatives.join("|")
            ))
            .ok()
        };

        Self { block_end }
    }

    fn closes_block(&self, line: &str) -> bool {
        self.block_end.as_ref().is_some_and(|re| re.is_match(line))
    }

    /// Turn a finished block into a line item. Blocks missing either anchor
    /// yield nothing.
    fn parse_block(&self, block: &[String]) -> Result<Option<InvoiceLine>, ExtractionError> {
        let Some(block_end) = &self.block_end else {
            return Ok(None);
        };

        let full = block.join(" ");
        let Some(start) = ADK_BLOCK_START.captures(&full) else {
            return Ok(None);
        };
        let Some(start_match) = start.get(0) else {
            return Ok(None);
        };
        let rest = &full[start_match.end()..];
        let Some(end) = block_end.captures(rest) else {
            trace!("discarding unterminated block: {}", full);
            return Ok(None);
        };
        let Some(end_match) = end.get(0) else {
            return Ok(None);
        };

        let quantity: Decimal = end["quantity"]
            .parse()
            .map_err(|_| ExtractionError::parse("Quantity", &end["quantity"]))?;
        let price = required_number("Unit_Price", &end["price"])?;

        let middle = rest[..end_match.start()].trim();
        let (code_2, description) = match middle.split_once(' ') {
            Some((first, remainder)) if ADK_CODE.is_match(first) => (Some(first), remainder.trim()),
            _ => (None, middle),
        };

        let mut line = InvoiceLine::new();
        line.insert("Line_Number".into(), text_cell(Some(&start["item"])));
        line.insert("Code".into(), text_cell(Some(&start["code"])));
        line.insert("Code_2".into(), text_cell(code_2));
        line.insert("Description".into(), text_cell(Some(description)));
        line.insert("Brand".into(), text_cell(Some(&end["brand"])));
        line.insert("Quantity".into(), quantity.into());
        line.insert("Unit_Price".into(), price.into());
        line.insert("Total".into(), line_total(quantity, price)?.into());

        Ok(Some(line))
    }

    fn flush(&self, block: Vec<String>, table: &mut InvoiceTable) -> Result<(), ExtractionError> {
        if let Some(line) = self.parse_block(&block)? {
            table.push(line);
        }
        Ok(())
    }
}

impl Default for AdkParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for AdkParser {
    fn name(&self) -> &'static str {
        "adk"
    }

    fn attempt(&self, doc: &InvoiceDocument) -> Result<Option<InvoiceTable>, ExtractionError> {
        if self.block_end.is_none() {
            debug!("adk parser has no brands configured");
            return Ok(None);
        }

        let mut table = InvoiceTable::new(self.name());
        let mut state = BlockState::Idle;

        for line in doc.lines() {
            state = match (state, ADK_BLOCK_START.is_match(line)) {
                (BlockState::Collecting(block), true) => {
                    self.flush(block, &mut table)?;
                    BlockState::Collecting(vec![line.to_string()])
                }
                (BlockState::Idle, true) => BlockState::Collecting(vec![line.to_string()]),
                (BlockState::Collecting(mut block), false) => {
                    block.push(line.to_string());
                    BlockState::Collecting(block)
                }
                (BlockState::Idle, false) => BlockState::Idle,
            };

            let closed = matches!(state, BlockState::Collecting(_)) && self.closes_block(line);
            if closed {
                if let BlockState::Collecting(block) = std::mem::take(&mut state) {
                    self.flush(block, &mut table)?;
                }
            }
        }

        if let BlockState::Collecting(block) = state {
            self.flush(block, &mut table)?;
        }

        Ok(table.non_empty())
    }
}

//! Commercial invoice line-item extraction.
//!
//! Several fixed-layout parsers, each tuned to one vendor's line format, are
//! tried before a generic parser that maps table headers to canonical
//! columns. See [`ParserChain`].

pub mod adk;
pub mod cells;
mod chain;
pub mod columns;
pub mod gate;
pub mod patterns;
pub mod sofabex;
pub mod universal;

pub use adk::AdkParser;
pub use cells::derive_total;
pub use chain::{ChainOutcome, InvoiceParser, ParserChain, ParserFailure};
pub use columns::{ColumnMapping, canonical_column, detect_columns, normalize_header};
pub use gate::GateParser;
pub use sofabex::{Language, SofabexParser, detect_language};
pub use universal::UniversalParser;

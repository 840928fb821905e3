//! Core library for customs declaration and commercial invoice extraction.
//!
//! This crate provides:
//! - Text cleaning and locale-aware number parsing
//! - Declaration segmentation and product block splitting
//! - Generic `LABEL: value` extraction with multilingual field normalization
//! - Quantity/country disambiguation of extracted product records
//! - An ordered invoice parser chain (fixed layouts plus a header-mapped
//!   generic parser)
//! - Reconciliation of invoiced against declared quantities per reference

pub mod compare;
pub mod declaration;
pub mod error;
pub mod invoice;
pub mod models;
pub mod text;

pub use compare::{ComparisonRow, MatchStatus, compare};
pub use declaration::{
    DeclarationSegmenter, DeclarationTable, ProductExtraction, ProductExtractor, ProductTable,
};
pub use error::{AduanaError, ExtractionError, Result};
pub use invoice::{ChainOutcome, InvoiceParser, ParserChain};
pub use models::{
    AduanaConfig, CellValue, DeclarationBlock, Field, FieldRecord, InvoiceDocument, InvoiceLine,
    InvoiceTable, ProductRecord,
};

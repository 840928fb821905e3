//! Data models for declaration and invoice records.

pub mod config;
pub mod invoice;
pub mod record;

pub use config::AduanaConfig;
pub use invoice::{CellGrid, CellValue, InvoiceDocument, InvoiceLine, InvoicePage, InvoiceTable};
pub use record::{DeclarationBlock, Field, FieldRecord, ProductRecord};

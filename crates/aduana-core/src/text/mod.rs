//! Shared text and number utilities.

pub mod clean;
pub mod numbers;

pub use clean::{clean_declaration_text, clean_document, is_filler_line, strip_accents};
pub use numbers::{parse_locale_decimal, parse_locale_number, quantity_as_integer, round_money};

//! Regex patterns for customs declaration text.

use lazy_static::lazy_static;
use regex::Regex;

/// Unit tokens that accompany an embedded quantity.
pub const UNIT_TOKENS: &str = r"UNIDADES|UNIDAD|UNID|UND|PIEZAS|PIEZA|PZA|PZ|PCS";

lazy_static! {
    // Declaration marker: DECLARACION 12 DE 2024
    pub static ref DECLARATION_MARKER: Regex = Regex::new(
        r"(?i)DECLARACI[OÓ]N\s+(\d+)\s+DE\s+(\d+)"
    ).unwrap();

    // Start of the product-bearing section of a declaration
    pub static ref PRODUCT_MARKER: Regex = Regex::new(
        r"(?i)(?:NOMBRE\s+T[EÉ]CNICO\s+DEL\s+PRODUCTO|PRODUCTO)\s*:\s*"
    ).unwrap();

    pub static ref LEADING_PRODUCT_MARKER: Regex = Regex::new(
        r"(?i)^\s*(?:NOMBRE\s+T[EÉ]CNICO\s+DEL\s+PRODUCTO|PRODUCTO)\s*:\s*"
    ).unwrap();

    // Upper-case label followed by a colon: "PAIS ORIGEN:", "REF.:", "P/N:"
    pub static ref LABEL: Regex = Regex::new(
        r"\b(\p{Lu}[\p{Lu} \t/.]{2,60}?)[ \t]*:"
    ).unwrap();

    // Word positions inside a label candidate
    pub static ref LABEL_WORD: Regex = Regex::new(r"\S+").unwrap();

    // ", 1.234.567,89" left dangling after the product description
    pub static ref NUMERIC_TAIL: Regex = Regex::new(r",\s*[\d\s.,]{6,}$").unwrap();

    // Everything from a "//" continuation marker onward
    pub static ref CONTINUATION_SUFFIX: Regex = Regex::new(r"(?s)\s*//.*$").unwrap();

    // A segment made of filler only: "XXXXXXXX 0001"
    pub static ref FILLER_SEGMENT: Regex = Regex::new(r"^[Xx\s\d.,\-]*$").unwrap();

    // Filler run opening a continuation: "// XXXXXXXX 0002, MARCA: ..."
    pub static ref FILLER_LEAD: Regex = Regex::new(r"^[Xx]{4,}").unwrap();

    // CANT (6), CANT: 6, CANTIDAD 6, CANT. 6 UND
    pub static ref QTY_LABELED: Regex = Regex::new(&format!(
        r"(?i)\bCANT(?:IDAD|\.)?\s*[:.]?\s*\(?\s*(\d+(?:[.,]\d+)?)\s*\)?(?:\s*({})\b)?",
        UNIT_TOKENS
    )).unwrap();

    // 6 UND, (6) UND
    pub static ref QTY_WITH_UNIT: Regex = Regex::new(&format!(
        r"(?i)\(?\b(\d+(?:[.,]\d+)?)\)?\s*({})\b",
        UNIT_TOKENS
    )).unwrap();

    pub static ref UNIT_TOKEN: Regex = Regex::new(&format!(
        r"(?i)\b({})\b",
        UNIT_TOKENS
    )).unwrap();

    // CHINA - 399   /   REINO UNIDO – 628.
    pub static ref COUNTRY_WITH_CODE: Regex = Regex::new(
        r"^(.+?)\s*[-–—]\s*(\d{2,3})\.?$"
    ).unwrap();
}

//! Splitting a declaration's product section into product blocks.

use crate::text::is_filler_line;

use super::patterns::{FILLER_LEAD, FILLER_SEGMENT, LEADING_PRODUCT_MARKER, PRODUCT_MARKER};

/// Product block delimiter.
pub const PRODUCT_DELIMITER: &str = "//";

/// The product-bearing part of a declaration block: everything from the first
/// product marker onward. `None` when the block names no product.
pub fn product_section(block: &str) -> Option<&str> {
    PRODUCT_MARKER.find(block).map(|m| &block[m.start()..])
}

/// Split a product section into individual product blocks.
///
/// Segments are trimmed and stripped of a leading product marker. A trailing
/// filler line (`XXXXXXXX`) is removed from the last segment. Empty segments
/// and segments holding nothing but filler are discarded. A segment opening
/// with filler but carrying more fields (`// XXXXXXXX 0002, MARCA: ACME`) is a
/// continuation and stays with the previous product.
pub fn split_products(section: &str) -> Vec<String> {
    let mut segments: Vec<&str> = section.split(PRODUCT_DELIMITER).collect();

    if let Some(last) = segments.last_mut() {
        let trimmed = trim_trailing_filler(*last);
        *last = trimmed;
    }

    let mut products: Vec<String> = Vec::new();
    for segment in segments {
        let segment = segment.trim();
        let segment = match LEADING_PRODUCT_MARKER.find(segment) {
            Some(m) => segment[m.end()..].trim(),
            None => segment,
        };
        if segment.is_empty() || FILLER_SEGMENT.is_match(segment) {
            continue;
        }

        if FILLER_LEAD.is_match(segment) {
            if let Some(previous) = products.last_mut() {
                previous.push_str(" // ");
                previous.push_str(segment);
                continue;
            }
        }
        products.push(segment.to_string());
    }
    products
}

fn trim_trailing_filler(segment: &str) -> &str {
    let mut trimmed = segment.trim_end();
    while let Some((head, last_line)) = trimmed.rsplit_once('\n') {
        if !is_filler_line(last_line) {
            break;
        }
        trimmed = head.trim_end();
    }
    if is_filler_line(trimmed) { "" } else { trimmed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trailing_delimiter_yields_no_empty_block() {
        assert_eq!(split_products("A//B//"), vec!["A", "B"]);
    }

    #[test]
    fn test_segments_are_trimmed() {
        assert_eq!(
            split_products("  FILTRO, MARCA: X  //\n BOMBA, MARCA: Y \n"),
            vec!["FILTRO, MARCA: X", "BOMBA, MARCA: Y"]
        );
    }

    #[test]
    fn test_leading_product_marker_stripped() {
        assert_eq!(
            split_products("PRODUCTO: FILTRO, MARCA: X // PRODUCTO: BOMBA"),
            vec!["FILTRO, MARCA: X", "BOMBA"]
        );
    }

    #[test]
    fn test_trailing_filler_removed() {
        assert_eq!(
            split_products("FILTRO // BOMBA, MARCA: Y\nXXXXXXXXXXXX\nXXXXXXXX"),
            vec!["FILTRO", "BOMBA, MARCA: Y"]
        );
    }

    #[test]
    fn test_filler_segments_discarded() {
        assert_eq!(
            split_products("FILTRO // XXXXXXXXXXXX 0002 // BOMBA"),
            vec!["FILTRO", "BOMBA"]
        );
    }

    #[test]
    fn test_continuation_stays_with_product() {
        assert_eq!(
            split_products("FILTRO, SERIAL: NO TIENE // XXXXXXXXXXXX 0002, MARCA: ACME // BOMBA"),
            vec!["FILTRO, SERIAL: NO TIENE // XXXXXXXXXXXX 0002, MARCA: ACME", "BOMBA"]
        );
    }

    #[test]
    fn test_product_section_starts_at_marker() {
        let block = "DECLARACION 1 DE 2024\nNIT 900\nNOMBRE TECNICO DEL PRODUCTO: FILTRO";
        assert_eq!(
            product_section(block),
            Some("NOMBRE TECNICO DEL PRODUCTO: FILTRO")
        );
        assert_eq!(product_section("DECLARACION 1 DE 2024\nNIT 900"), None);
    }
}

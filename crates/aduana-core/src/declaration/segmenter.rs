//! Splitting a document into declaration blocks.

use regex::Regex;
use tracing::debug;

use crate::models::record::DeclarationBlock;

use super::patterns::DECLARATION_MARKER;

/// Splits document text on `DECLARACION <n> DE <year>` markers.
#[derive(Debug, Clone)]
pub struct DeclarationSegmenter {
    terminal: Option<Regex>,
}

impl DeclarationSegmenter {
    /// Create a segmenter that ends blocks at a line holding only
    /// `terminal_delimiter`. An empty delimiter disables the terminal rule.
    pub fn new(terminal_delimiter: &str) -> Self {
        // Cleaning collapses inline whitespace, so the marker's own spacing
        // is matched loosely.
        let words: Vec<String> = terminal_delimiter
            .split_whitespace()
            .map(regex::escape)
            .collect();
        let terminal = if words.is_empty() {
            None
        } else {
            Regex::new(&format!(r"(?mi)^[ \t]*{}[ \t]*$", words.join(r"[ \t]+"))).ok()
        };
        Self { terminal }
    }

    /// Split `text` into declaration blocks ordered by declaration number.
    ///
    /// Each block starts at its marker and ends at the terminal delimiter
    /// line when one occurs before the next marker, otherwise at the next
    /// marker or the end of text. Text without any marker is returned as a
    /// single declaration numbered 1.
    pub fn segment(&self, text: &str) -> Vec<DeclarationBlock> {
        let matches: Vec<_> = DECLARATION_MARKER.captures_iter(text).collect();

        if matches.is_empty() {
            debug!("no declaration marker found, treating text as declaration 1");
            let raw_text = text.trim();
            if raw_text.is_empty() {
                return Vec::new();
            }
            return vec![DeclarationBlock {
                declaration_number: 1,
                raw_text: raw_text.to_string(),
            }];
        }

        let mut blocks = Vec::with_capacity(matches.len());
        for (i, caps) in matches.iter().enumerate() {
            let Some(marker) = caps.get(0) else { continue };
            let start = marker.start();
            let limit = matches
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map(|next| next.start())
                .unwrap_or(text.len());

            let end = self
                .terminal
                .as_ref()
                .and_then(|re| re.find(&text[marker.end()..limit]))
                .map(|m| marker.end() + m.end())
                .unwrap_or(limit);

            // Numbers beyond u32 cannot be real declaration numbers; keep
            // the block in document order at the end.
            let declaration_number = caps[1].parse::<u32>().unwrap_or(u32::MAX);

            blocks.push(DeclarationBlock {
                declaration_number,
                raw_text: text[start..end].trim().to_string(),
            });
        }

        // Stable: ties keep document order.
        blocks.sort_by_key(|b| b.declaration_number);

        debug!("segmented {} declaration blocks", blocks.len());
        blocks
    }
}

impl Default for DeclarationSegmenter {
    fn default() -> Self {
        Self::new(&crate::models::config::DeclarationConfig::default().terminal_delimiter)
    }
}

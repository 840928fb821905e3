//! Text cleaning for PDF-extracted documents.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

lazy_static! {
    static ref HYPHEN_WRAP: Regex = Regex::new(r"-[ \t]*\n\s*").unwrap();
    static ref INLINE_SPACE: Regex = Regex::new(r"[ \t\u{00a0}]+").unwrap();
    static ref NO_DILIGENCIABLE: Regex = Regex::new(r"(?i)NO\s+DILIGENCIABLE").unwrap();
}

/// Normalize a document's raw text.
///
/// Joins hyphenated line-wraps, strips control characters other than
/// newline and tab, collapses runs of inline whitespace, trims every line and
/// drops blank lines. Line structure is otherwise preserved.
pub fn clean_document(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = HYPHEN_WRAP.replace_all(&text, "");
    let text: String = text
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    text.lines()
        .map(|line| INLINE_SPACE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clean a declaration document.
///
/// On top of [`clean_document`], optionally removes the non-fillable regions
/// that customs forms insert between the form body and continuation pages.
pub fn clean_declaration_text(raw: &str, strip_continuations: bool) -> String {
    let mut text = clean_document(raw);
    if strip_continuations {
        text = strip_continuation_regions(&text);
        text = strip_inline_markers(&text);
        text = NO_DILIGENCIABLE.replace_all(&text, " ").into_owned();
        text = clean_document(&text);
    }
    text
}

/// Remove every `<!-- continua` / `<-- continua` region up to the next
/// `<< do` / `<<do` marker. An unterminated region is left in place.
fn strip_continuation_regions(text: &str) -> String {
    let mut src = text.to_string();

    loop {
        let low = src.to_lowercase();
        let start = [low.find("<!-- continua"), low.find("<-- continua")]
            .into_iter()
            .flatten()
            .min();
        let Some(start) = start else { break };

        let end = [low[start..].find("<< do"), low[start..].find("<<do")]
            .into_iter()
            .flatten()
            .min()
            .map(|offset| start + offset);
        let Some(end) = end else { break };

        // Lower-casing can change byte lengths outside ASCII.
        if low.len() != src.len() {
            break;
        }
        src.replace_range(start..end, "");
    }

    src
}

/// Replace `<< ... >>` markers mentioning `do` or `declar` with a space.
fn strip_inline_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("<<") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find(">>") else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };

        let inner = after_open[..close].trim().to_lowercase();
        if inner.contains("do") || inner.contains("declar") {
            out.push(' ');
        } else {
            out.push_str(&rest[open..open + 2 + close + 2]);
        }
        rest = &after_open[close + 2..];
    }
    out.push_str(rest);

    out
}

/// Whether a line consists solely of one repeated filler character
/// (`X` or `x`).
pub fn is_filler_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && (trimmed.chars().all(|c| c == 'X') || trimmed.chars().all(|c| c == 'x'))
}

/// Remove diacritics (`PAÍS` becomes `PAIS`).
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

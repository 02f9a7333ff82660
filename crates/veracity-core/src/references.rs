//! Reference-section parsing and structural validation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ReferenceEntry;

/// Bibliography-style section headers.
static SECTION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:references|bibliography|works\s+cited|literature\s+cited)\b").unwrap()
});

/// Markers that terminate the reference section.
static SECTION_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:appendix|acknowledge?ments)\b").unwrap());

/// Patterns that begin a new bibliographic item: a bracketed or plain numeral
/// followed by `.`/`)`, a bracketed citation key, or a bullet glyph.
static ITEM_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\d+\]|\[[A-Z]{2,}\+?\d*\]|(?:^|\s)\d{1,3}[.)]\s|[•·▪‣]").unwrap()
});

static DOI: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:doi\.org/|doi:|10\.\d{2,9}/)").unwrap());
static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)https?://").unwrap());
static PAREN_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\d{4}\)").unwrap());

/// Capture the span between a bibliography header and the first terminating
/// marker (or end of text). `None` when no header exists.
pub fn find_reference_section(text: &str) -> Option<&str> {
    let header = SECTION_HEADER.find(text)?;
    let rest = &text[header.end()..];
    let end = SECTION_END
        .find(rest)
        .map(|m| m.start())
        .unwrap_or(rest.len());
    Some(rest[..end].trim())
}

/// Split a reference section into individual entries, in document order.
///
/// Splits at recognized item-start markers; when a section carries no markers
/// at all, falls back to line boundaries. Entries empty after trimming are
/// discarded.
pub fn segment_entries(section: &str) -> Vec<String> {
    let mut starts: Vec<usize> = Vec::new();
    for m in ITEM_START.find_iter(section) {
        // The plain-numeral alternative consumes a leading whitespace char;
        // anchor the entry at the marker itself.
        let start = section[m.start()..]
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map(|(i, _)| m.start() + i)
            .unwrap_or(m.start());
        starts.push(start);
    }

    if starts.is_empty() {
        return section
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
    }

    let mut entries = Vec::new();
    let preamble = section[..starts[0]].trim();
    if !preamble.is_empty() {
        entries.push(preamble.to_string());
    }
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(section.len());
        let entry = section[start..end].trim();
        if !entry.is_empty() {
            entries.push(entry.to_string());
        }
    }
    entries
}

/// Structural validity: the entry carries a DOI, an http(s) URL, the literal
/// `ISBN`, or a 4-digit year in parentheses.
pub fn is_structurally_valid(entry: &str) -> bool {
    DOI.is_match(entry)
        || URL.is_match(entry)
        || entry.contains("ISBN")
        || PAREN_YEAR.is_match(entry)
}

/// Parse the reference section of `text` into validated entries.
///
/// Returns an empty list when no bibliography-style header is present.
pub fn parse_references(text: &str) -> Vec<ReferenceEntry> {
    let Some(section) = find_reference_section(text) else {
        return vec![];
    };

    segment_entries(section)
        .into_iter()
        .map(|raw_text| {
            let is_valid = is_structurally_valid(&raw_text);
            ReferenceEntry { raw_text, is_valid }
        })
        .collect()
}

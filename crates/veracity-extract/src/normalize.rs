use once_cell::sync::Lazy;
use regex::Regex;

/// Academic boilerplate section labels stripped during normalization.
///
/// Only standalone, newline-terminated header lines are removed. The
/// references/bibliography header and body are deliberately left alone:
/// reference parsing depends on that content.
static BOILERPLATE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:declaration|certificate|acknowledgements?|appendix|table of contents)[ \t]*:?[ \t]*\r?\n",
    )
    .unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize curly quote glyph variants to straight ASCII quotes.
pub fn normalize_quotes(text: &str) -> String {
    text.replace(
        ['\u{201C}', '\u{201D}', '\u{201E}', '\u{201F}'],
        "\"",
    )
    .replace(['\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'], "'")
}

/// Clean raw extracted text into the normalized form the analyzers expect.
///
/// Passes, in order:
/// 1. strip boilerplate section header lines
/// 2. normalize quote glyphs
/// 3. collapse whitespace runs to single spaces and trim
///
/// Idempotent: `clean_text(clean_text(t)) == clean_text(t)`.
pub fn clean_text(text: &str) -> String {
    let stripped = BOILERPLATE_HEADER.replace_all(text, "");
    let quoted = normalize_quotes(&stripped);
    WHITESPACE.replace_all(&quoted, " ").trim().to_string()
}

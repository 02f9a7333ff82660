//! Renders an [`AnalysisResult`] into report artifacts.
//!
//! The layout here is presentation only; the `AnalysisResult` shape is the
//! binding contract. Paginated (PDF) rendering is a downstream concern.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use veracity_core::AnalysisResult;

/// How many characters of the document to include as a preview.
const PREVIEW_CHARS: usize = 2000;

/// How many characters of a paraphrase excerpt to show.
const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

impl ReportFormat {
    /// Pick a format from a file extension, defaulting to text.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
            .as_str()
        {
            "md" | "markdown" => Self::Markdown,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Render a report for `result` in the requested format.
pub fn render(
    source_name: &str,
    document_text: &str,
    result: &AnalysisResult,
    format: ReportFormat,
) -> String {
    match format {
        ReportFormat::Text => render_text(source_name, document_text, result),
        ReportFormat::Markdown => render_markdown(source_name, document_text, result),
        ReportFormat::Json => export_json(source_name, result),
    }
}

/// Render and write a report to `path`, with the format chosen from the
/// file extension.
pub fn write_report(
    path: &Path,
    source_name: &str,
    document_text: &str,
    result: &AnalysisResult,
) -> Result<(), String> {
    let content = render(
        source_name,
        document_text,
        result,
        ReportFormat::from_path(path),
    );
    std::fs::write(path, content).map_err(|e| format!("Failed to write report: {}", e))
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}...")
    }
}

fn validity_label(is_valid: bool) -> &'static str {
    if is_valid { "valid" } else { "invalid" }
}

fn render_text(source_name: &str, document_text: &str, result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Originality Analysis Report: {source_name}");
    let _ = writeln!(out, "Score: {:.1}%", result.score);
    let _ = writeln!(out);

    let _ = writeln!(out, "Document Preview");
    let _ = writeln!(out, "{}", truncate_chars(document_text, PREVIEW_CHARS));
    let _ = writeln!(out);

    let _ = writeln!(out, "Direct Quotes ({})", result.quotes.len());
    for quote in &result.quotes {
        let _ = writeln!(out, "  \"{}\"", quote.text);
        let _ = writeln!(out, "    Sources: {}", quote.sources.join(", "));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Paraphrase Candidates ({})", result.paraphrases.len());
    for para in &result.paraphrases {
        let _ = writeln!(out, "  {}", truncate_chars(&para.text, EXCERPT_CHARS));
        let _ = writeln!(
            out,
            "    Similarity: {:.0}%  Sources: {}",
            para.similarity * 100.0,
            para.sources.join(", ")
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Reference Validation ({})", result.references.len());
    for entry in &result.references {
        let _ = writeln!(
            out,
            "  [{}] {}",
            validity_label(entry.is_valid),
            entry.raw_text
        );
    }

    out
}

fn render_markdown(source_name: &str, document_text: &str, result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Originality Analysis Report: {source_name}");
    let _ = writeln!(out);
    let _ = writeln!(out, "**Score: {:.1}%**", result.score);
    let _ = writeln!(out);

    let _ = writeln!(out, "## Document Preview");
    let _ = writeln!(out);
    let _ = writeln!(out, "> {}", truncate_chars(document_text, PREVIEW_CHARS));
    let _ = writeln!(out);

    let _ = writeln!(out, "## Direct Quotes");
    let _ = writeln!(out);
    if result.quotes.is_empty() {
        let _ = writeln!(out, "_No direct quotes detected._");
    }
    for quote in &result.quotes {
        let _ = writeln!(out, "- \"{}\"", quote.text);
        let _ = writeln!(out, "  - Sources: {}", quote.sources.join(", "));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Paraphrase Candidates");
    let _ = writeln!(out);
    if result.paraphrases.is_empty() {
        let _ = writeln!(out, "_No paraphrased content detected._");
    }
    for para in &result.paraphrases {
        let _ = writeln!(
            out,
            "- {} ({:.0}%)",
            truncate_chars(&para.text, EXCERPT_CHARS),
            para.similarity * 100.0
        );
        if !para.sources.is_empty() {
            let _ = writeln!(out, "  - Sources: {}", para.sources.join(", "));
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Reference Validation");
    let _ = writeln!(out);
    if result.references.is_empty() {
        let _ = writeln!(out, "_No reference section found._");
    }
    for entry in &result.references {
        let _ = writeln!(
            out,
            "- **{}**: {}",
            validity_label(entry.is_valid),
            entry.raw_text
        );
    }

    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    generated_at: String,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

fn export_json(source_name: &str, result: &AnalysisResult) -> String {
    let report = JsonReport {
        source: source_name,
        generated_at: chrono::Utc::now().to_rfc3339(),
        result,
    };
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}

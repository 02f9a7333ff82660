use std::io::Write;

use owo_colors::OwoColorize;
use veracity_core::AnalysisResult;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}...")
    }
}

/// Print the score headline, colored by severity band.
pub fn print_score(w: &mut dyn Write, score: f64, color: ColorMode) -> std::io::Result<()> {
    let line = format!("Originality score: {:.1}%", score);
    if color.enabled() {
        if score < 25.0 {
            writeln!(w, "{}", line.green())?;
        } else if score < 50.0 {
            writeln!(w, "{}", line.yellow())?;
        } else {
            writeln!(w, "{}", line.red())?;
        }
    } else {
        writeln!(w, "{}", line)?;
    }
    Ok(())
}

/// Print the complete analysis summary.
pub fn print_analysis(
    w: &mut dyn Write,
    source_name: &str,
    result: &AnalysisResult,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Analysis of {}", source_name)?;
    print_score(w, result.score, color)?;
    writeln!(w)?;

    writeln!(w, "Direct quotes: {}", result.quotes.len())?;
    for quote in &result.quotes {
        writeln!(w, "  \"{}\"", truncate(&quote.text, 80))?;
        let sources = quote.sources.join(", ");
        if color.enabled() {
            writeln!(w, "    {}", format!("Sources: {}", sources).dimmed())?;
        } else {
            writeln!(w, "    Sources: {}", sources)?;
        }
    }
    writeln!(w)?;

    writeln!(w, "Paraphrase candidates: {}", result.paraphrases.len())?;
    for para in &result.paraphrases {
        writeln!(
            w,
            "  {} ({:.0}%)",
            truncate(&para.text, 80),
            para.similarity * 100.0
        )?;
        if !para.sources.is_empty() {
            let sources = para.sources.join(", ");
            if color.enabled() {
                writeln!(w, "    {}", format!("Sources: {}", sources).dimmed())?;
            } else {
                writeln!(w, "    Sources: {}", sources)?;
            }
        }
    }
    writeln!(w)?;

    if result.references.is_empty() {
        writeln!(w, "No reference section found")?;
        return Ok(());
    }

    let valid = result.references.iter().filter(|r| r.is_valid).count();
    let invalid = result.references.len() - valid;
    writeln!(
        w,
        "References: {} valid, {} invalid",
        valid, invalid
    )?;
    for entry in &result.references {
        let marker = if entry.is_valid { "ok " } else { "bad" };
        let line = format!("  [{}] {}", marker, truncate(&entry.raw_text, 100));
        if color.enabled() {
            if entry.is_valid {
                writeln!(w, "{}", line.green())?;
            } else {
                writeln!(w, "{}", line.red())?;
            }
        } else {
            writeln!(w, "{}", line)?;
        }
    }
    Ok(())
}

use docx_rs::{DocumentChild, ParagraphChild, RunChild};

use crate::ExtractError;

/// Extract the paragraph texts of a DOCX payload, in document order.
///
/// Walks paragraph runs only; tables, headers and footers are not part of the
/// analyzable body. Empty paragraphs are dropped. A document with no
/// paragraph text at all yields an empty list, which is valid output.
pub fn extract_paragraphs(payload: &[u8]) -> Result<Vec<String>, ExtractError> {
    let docx = docx_rs::read_docx(payload)
        .map_err(|e| ExtractError::Extraction(format!("docx parse failed: {e}")))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(para) = child {
            let mut buf = String::new();
            for para_child in &para.children {
                if let ParagraphChild::Run(run) = para_child {
                    for run_child in &run.children {
                        if let RunChild::Text(t) = run_child {
                            buf.push_str(&t.text);
                        }
                    }
                }
            }
            let trimmed = buf.trim();
            if !trimmed.is_empty() {
                paragraphs.push(trimmed.to_string());
            }
        }
    }

    Ok(paragraphs)
}

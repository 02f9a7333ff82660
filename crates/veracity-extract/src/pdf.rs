use crate::ExtractError;

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level page-text step; normalization and the
/// rest of the pipeline live in [`crate::DocumentExtractor`].
pub trait PdfReader: Send + Sync {
    /// Extract the full text of a PDF payload, pages joined by newlines.
    fn extract_text(&self, payload: &[u8]) -> Result<String, ExtractError>;
}

/// Default backend built on the pure-Rust `pdf-extract` crate.
pub struct PdfTextReader;

impl PdfReader for PdfTextReader {
    fn extract_text(&self, payload: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(payload)
            .map_err(|e| ExtractError::Extraction(format!("pdf-extract failed: {e}")))
    }
}

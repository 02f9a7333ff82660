use std::path::Path;

use thiserror::Error;

pub mod docx;
pub mod normalize;
pub mod pdf;

pub use normalize::clean_text;
pub use pdf::{PdfReader, PdfTextReader};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
    #[error("no OCR reader configured for image input")]
    NoOcrReader,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The kind of source document, decided before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Pdf,
    StructuredDocument,
    Image,
}

impl SourceKind {
    /// Map a file extension to a source kind.
    ///
    /// Anything outside the supported set is an [`ExtractError::UnsupportedFormat`],
    /// not a silent fallback to plain text.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "txt" | "md" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::StructuredDocument),
            "png" | "jpg" | "jpeg" => Ok(Self::Image),
            other => Err(ExtractError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A source document: the raw payload plus its declared kind.
/// Immutable once constructed; extraction never mutates it.
#[derive(Debug, Clone)]
pub struct Document {
    pub payload: Vec<u8>,
    pub kind: SourceKind,
}

impl Document {
    pub fn new(payload: Vec<u8>, kind: SourceKind) -> Self {
        Self { payload, kind }
    }

    /// Read a document from disk, inferring the kind from the extension.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let kind = SourceKind::from_path(path)?;
        let payload = std::fs::read(path)?;
        Ok(Self { payload, kind })
    }
}

/// Trait for image-to-text (OCR) backends.
///
/// Concrete vision providers live outside this workspace; tests use a mock.
/// An empty recognition result is valid output (a blank image), not an error.
pub trait OcrReader: Send + Sync {
    fn recognize(&self, image: &[u8]) -> Result<String, ExtractError>;
}

/// Converts a [`Document`] into a single normalized text string.
///
/// Dispatches on the source kind to a format reader, then applies
/// [`clean_text`] to the raw output.
pub struct DocumentExtractor {
    pdf: Box<dyn PdfReader>,
    ocr: Option<Box<dyn OcrReader>>,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor {
    pub fn new() -> Self {
        Self {
            pdf: Box::new(PdfTextReader),
            ocr: None,
        }
    }

    /// Replace the PDF reader backend.
    pub fn with_pdf_reader(mut self, pdf: Box<dyn PdfReader>) -> Self {
        self.pdf = pdf;
        self
    }

    /// Attach an OCR backend for image documents.
    pub fn with_ocr_reader(mut self, ocr: Box<dyn OcrReader>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Extract and normalize the document text.
    ///
    /// Fails with [`ExtractError::Extraction`] when a reader cannot parse the
    /// payload. An image that OCRs to nothing yields an empty string.
    pub fn extract(&self, doc: &Document) -> Result<String, ExtractError> {
        let raw = match doc.kind {
            SourceKind::Text => String::from_utf8(doc.payload.clone())
                .map_err(|e| ExtractError::Extraction(format!("invalid UTF-8 text: {e}")))?,
            SourceKind::Pdf => self.pdf.extract_text(&doc.payload)?,
            SourceKind::StructuredDocument => docx::extract_paragraphs(&doc.payload)?.join("\n"),
            SourceKind::Image => match &self.ocr {
                Some(ocr) => ocr.recognize(&doc.payload)?,
                None => return Err(ExtractError::NoOcrReader),
            },
        };

        Ok(clean_text(&raw))
    }
}

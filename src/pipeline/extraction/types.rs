use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Where the document text came from. Informational only for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    PlainText,
    Markdown,
    Pdf,
    Image,
    Unsupported,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::Markdown => "markdown",
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Unsupported => "unsupported",
        }
    }

    /// Formats this crate can turn into text without an external OCR step.
    pub fn is_extractable(&self) -> bool {
        matches!(self, Self::PlainText | Self::Markdown | Self::Pdf)
    }
}

/// Result of format detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatDetection {
    pub mime_type: String,
    pub format: SourceFormat,
    pub size_bytes: u64,
}

/// Extracted, normalised document text ready for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub text: String,
    pub source_format: SourceFormat,
}

impl Document {
    pub fn new(text: impl Into<String>, source_format: SourceFormat) -> Self {
        Self {
            text: text.into(),
            source_format,
        }
    }

    /// Text supplied directly by a caller; not normalised.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(text, SourceFormat::PlainText)
    }
}

/// PDF text extraction abstraction (allows mocking for tests)
pub trait PdfExtractor {
    /// Raw text of each page, in page order.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

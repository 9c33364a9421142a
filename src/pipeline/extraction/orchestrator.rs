use std::path::Path;

use super::format::{detect_format, mime_hint_for_path, MAX_FILE_SIZE};
use super::pdf::PdfTextExtractor;
use super::sanitize::normalize_extracted_text;
use super::types::{Document, PdfExtractor, SourceFormat};
use super::ExtractionError;

/// Turns uploaded bytes into normalised document text.
pub struct DocumentExtractor {
    pdf: Box<dyn PdfExtractor + Send + Sync>,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(Box::new(PdfTextExtractor))
    }
}

impl DocumentExtractor {
    pub fn new(pdf: Box<dyn PdfExtractor + Send + Sync>) -> Self {
        Self { pdf }
    }

    /// Read and extract a file. The extension is only used as a MIME hint.
    pub fn extract_path(&self, path: &Path) -> Result<Document, ExtractionError> {
        let size = std::fs::metadata(path)?.len();
        if size > MAX_FILE_SIZE {
            return Err(ExtractionError::TooLarge {
                size,
                limit: MAX_FILE_SIZE,
            });
        }

        let bytes = std::fs::read(path)?;
        let hint = mime_hint_for_path(path);
        self.extract_bytes(&bytes, hint.as_deref())
    }

    pub fn extract_bytes(
        &self,
        bytes: &[u8],
        mime_hint: Option<&str>,
    ) -> Result<Document, ExtractionError> {
        let size = bytes.len() as u64;
        if size > MAX_FILE_SIZE {
            return Err(ExtractionError::TooLarge {
                size,
                limit: MAX_FILE_SIZE,
            });
        }

        let detection = detect_format(bytes, mime_hint);
        tracing::debug!(
            mime = %detection.mime_type,
            format = detection.format.as_str(),
            size,
            "Detected document format"
        );

        let text = match detection.format {
            SourceFormat::PlainText | SourceFormat::Markdown => {
                normalize_extracted_text(&decode_utf8(bytes)?)
            }
            SourceFormat::Pdf => self.extract_pdf(bytes)?,
            SourceFormat::Image | SourceFormat::Unsupported => {
                return Err(ExtractionError::UnsupportedFormat(detection.mime_type));
            }
        };

        tracing::info!(
            format = detection.format.as_str(),
            chars = text.chars().count(),
            "Document text extracted"
        );

        Ok(Document::new(text, detection.format))
    }

    /// Pages normalised one by one, blank pages dropped, joined by a blank line.
    fn extract_pdf(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let pages = self.pdf.extract_pages(bytes)?;
        let page_count = pages.len();

        let texts: Vec<String> = pages
            .iter()
            .map(|page| normalize_extracted_text(page))
            .filter(|page| !page.is_empty())
            .collect();

        if texts.is_empty() {
            tracing::warn!(page_count, "PDF has no text layer");
            return Err(ExtractionError::NoTextLayer);
        }

        if texts.len() < page_count {
            tracing::debug!(
                page_count,
                text_pages = texts.len(),
                "Some PDF pages have no text layer"
            );
        }

        Ok(texts.join("\n\n"))
    }
}

/// Strict UTF-8 decode. A leading byte order mark is dropped.
fn decode_utf8(bytes: &[u8]) -> Result<String, ExtractionError> {
    let body = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    String::from_utf8(body.to_vec()).map_err(|e| ExtractionError::EncodingError(e.to_string()))
}

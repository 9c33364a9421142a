use std::path::Path;

use super::types::{FormatDetection, SourceFormat};

/// Upper bound on input size. Larger files are reported as unsupported.
pub const MAX_FILE_SIZE: u64 = 25 * 1024 * 1024; // 25MB

/// Bytes inspected by the text heuristic.
const TEXT_SNIFF_LEN: usize = 4096;

/// Detect the document format from magic bytes, then the MIME hint, then
/// a UTF-8 check on the leading bytes. File extensions are never trusted
/// over content.
pub fn detect_format(bytes: &[u8], mime_hint: Option<&str>) -> FormatDetection {
    let size_bytes = bytes.len() as u64;
    let detection = |mime_type: &str, format: SourceFormat| FormatDetection {
        mime_type: mime_type.to_string(),
        format,
        size_bytes,
    };

    if size_bytes > MAX_FILE_SIZE {
        return detection("unknown", SourceFormat::Unsupported);
    }

    match bytes {
        // PDF: starts with %PDF
        [0x25, 0x50, 0x44, 0x46, ..] => return detection("application/pdf", SourceFormat::Pdf),
        // JPEG: starts with FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => return detection("image/jpeg", SourceFormat::Image),
        // PNG: starts with 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => return detection("image/png", SourceFormat::Image),
        // TIFF: little-endian (49 49 2A 00) or big-endian (4D 4D 00 2A)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => {
            return detection("image/tiff", SourceFormat::Image)
        }
        // HEIC/HEIF: "ftyp" at offset 4
        _ if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" => {
            return detection("image/heic", SourceFormat::Image)
        }
        _ => {}
    }

    let hint = mime_hint.map(|h| h.trim().to_ascii_lowercase());
    let textual = bytes.is_empty() || is_likely_text(bytes);

    match hint.as_deref() {
        Some("text/markdown" | "text/x-markdown") if textual => {
            detection("text/markdown", SourceFormat::Markdown)
        }
        Some(h) if h.starts_with("text/") && textual => detection("text/plain", SourceFormat::PlainText),
        Some(h) if h.starts_with("image/") => detection(h, SourceFormat::Image),
        _ if !bytes.is_empty() && textual => detection("text/plain", SourceFormat::PlainText),
        _ => detection("application/octet-stream", SourceFormat::Unsupported),
    }
}

/// MIME hint derived from a file name's extension.
pub fn mime_hint_for_path(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first().map(|m| m.essence_str().to_string())
}

/// Check if bytes are likely plain text (valid UTF-8, mostly printable)
fn is_likely_text(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(TEXT_SNIFF_LEN)];
    let text = match std::str::from_utf8(head) {
        Ok(t) => t,
        // A multi-byte char cut by the sniff window is still text.
        Err(e) if e.error_len().is_none() && e.valid_up_to() > 0 => {
            match std::str::from_utf8(&head[..e.valid_up_to()]) {
                Ok(t) => t,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };

    let total = text.chars().count();
    if total == 0 {
        return false;
    }

    // At least 80% printable characters (or whitespace)
    let printable = text
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .count();
    printable as f64 / total as f64 > 0.80
}

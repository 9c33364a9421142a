use std::ops::Range;

use super::sanitize::is_invisible;
use super::types::{Clause, Span};

/// Locate each clause's quoted text in the document and fill in its span.
///
/// Search runs forward from the end of the previous aligned clause, then
/// falls back to the start of the document for clauses the model reordered.
/// If neither finds the quote, the same two passes run again with invisible
/// characters ignored on both sides, since the model only ever saw the
/// document without them. Clauses that cannot be found keep `span = None`.
pub fn align(clauses: Vec<Clause>, document_text: &str) -> Vec<Clause> {
    let visible = document_text
        .chars()
        .any(is_invisible)
        .then(|| VisibleText::new(document_text));
    let mut cursor = 0usize;
    let mut misses = 0usize;

    let aligned: Vec<Clause> = clauses
        .into_iter()
        .enumerate()
        .map(|(index, mut clause)| {
            let found = locate(&clause.original_text, document_text, cursor)
                .or_else(|| visible.as_ref()?.locate(&clause.original_text, cursor));
            clause.span = found.and_then(|bytes| {
                let span = Span::from_byte_range(document_text, bytes.start, bytes.end)?;
                cursor = bytes.end;
                Some(span)
            });
            if clause.span.is_none() {
                misses += 1;
                tracing::debug!(
                    index,
                    title = %clause.title,
                    quote_len = clause.original_text.len(),
                    "Clause text not found in document"
                );
            }
            clause
        })
        .collect();

    if misses > 0 {
        tracing::debug!(misses, total = aligned.len(), "Alignment finished with misses");
    }
    aligned
}

/// Exact match from `cursor`, then exact match from 0. Byte offsets.
fn locate(original_text: &str, document_text: &str, cursor: usize) -> Option<Range<usize>> {
    let needle = original_text.trim();
    if needle.is_empty() {
        return None;
    }

    let forward = document_text
        .get(cursor..)
        .and_then(|tail| tail.find(needle))
        .map(|offset| cursor + offset);

    let start = forward.or_else(|| document_text.find(needle))?;
    Some(start..start + needle.len())
}

/// Document text with invisible characters removed. `origin[i]` is the byte
/// offset in the original text of byte `i` of `text`.
struct VisibleText {
    text: String,
    origin: Vec<usize>,
}

impl VisibleText {
    fn new(document_text: &str) -> Self {
        let mut text = String::with_capacity(document_text.len());
        let mut origin = Vec::with_capacity(document_text.len());
        for (offset, c) in document_text.char_indices().filter(|(_, c)| !is_invisible(*c)) {
            text.push(c);
            origin.extend(offset..offset + c.len_utf8());
        }
        Self { text, origin }
    }

    /// Same search order as [`locate`], mapped back to original byte offsets.
    /// The range may enclose invisible characters but never starts or ends
    /// on one.
    fn locate(&self, original_text: &str, cursor: usize) -> Option<Range<usize>> {
        let needle: String = original_text.chars().filter(|c| !is_invisible(*c)).collect();
        let from = self.origin.partition_point(|&offset| offset < cursor);
        let found = locate(&needle, &self.text, from)?;
        Some(self.origin[found.start]..self.origin[found.end - 1] + 1)
    }
}

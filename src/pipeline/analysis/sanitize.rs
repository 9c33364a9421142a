// Hygiene for the document text sent to the completion service.
// Only the outbound copy is touched: spans are always computed against the
// original text, so this must never rewrite ordinary clause wording.

/// Maximum document length sent to the model (characters).
pub const MAX_PROMPT_DOCUMENT_CHARS: usize = 60_000;

/// Sanitize document text for model consumption: strip invisible characters,
/// drop prompt-injection lines and truncate. Dropped lines are logged by
/// number; contract content is never logged.
pub fn sanitize_for_model(raw: &str, analysis_id: &str) -> String {
    let cleaned = remove_invisible_chars(raw);
    let (no_injection, removed) = remove_injection_lines(&cleaned);

    if !removed.is_empty() {
        tracing::warn!(
            analysis_id = %analysis_id,
            removed_lines = removed.len(),
            line_numbers = ?removed,
            "Injection patterns detected and removed from document input"
        );
    }

    let (text, truncated) = truncate_chars(&no_injection, MAX_PROMPT_DOCUMENT_CHARS);
    if truncated {
        tracing::warn!(
            analysis_id = %analysis_id,
            max_chars = MAX_PROMPT_DOCUMENT_CHARS,
            "Document truncated before classification; trailing clauses will not be analysed"
        );
    }
    text
}

/// Zero-width, bidi-override and non-whitespace control characters.
/// These never reach the model, so its quotes never contain them.
pub(crate) fn is_invisible(c: char) -> bool {
    if matches!(c, ' ' | '\n' | '\t' | '\r') {
        return false;
    }
    matches!(
        c,
        '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
    ) || c.is_control()
}

fn remove_invisible_chars(text: &str) -> String {
    text.chars().filter(|c| !is_invisible(*c)).collect()
}

/// Chat-template tokens anywhere at line start; plain role labels such as
/// `User:` only when they stand alone, so definition lines survive.
fn is_role_marker(trimmed: &str) -> bool {
    const TOKENS: &[&str] = &[
        "[system]",
        "[assistant]",
        "[inst]",
        "[/inst]",
        "<<sys>>",
        "<</sys>>",
        "<|im_start|>",
        "<|im_end|>",
        "<|system|>",
        "<|assistant|>",
        "note to ai:",
    ];
    const LABELS: &[&str] = &["system:", "assistant:", "user:"];
    TOKENS.iter().any(|t| trimmed.starts_with(t)) || LABELS.contains(&trimmed)
}

fn is_override_attempt(text: &str) -> bool {
    const PHRASES: &[&str] = &[
        "ignore previous instructions",
        "ignore all instructions",
        "ignore all previous instructions",
        "ignore the above instructions",
        "disregard your instructions",
        "disregard all instructions",
        "forget your instructions",
        "new instructions:",
    ];
    PHRASES.iter().any(|p| text.contains(p))
}

/// Closing tags of the prompt's own wrapper blocks.
fn is_wrapper_tag(trimmed: &str) -> bool {
    trimmed.starts_with("</contract_text")
        || trimmed.starts_with("<contract_text")
        || trimmed.starts_with("</reference_context")
        || trimmed.starts_with("<system")
        || trimmed.starts_with("</system")
}

/// Drop injection lines. Returns the cleaned text and the 1-based numbers
/// of the dropped lines.
fn remove_injection_lines(text: &str) -> (String, Vec<usize>) {
    let mut result = String::with_capacity(text.len());
    let mut removed = Vec::new();
    let mut first = true;

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim().to_lowercase();
        if is_role_marker(&trimmed) || is_override_attempt(&trimmed) || is_wrapper_tag(&trimmed) {
            removed.push(index + 1);
            continue;
        }
        if !first {
            result.push('\n');
        }
        first = false;
        result.push_str(line);
    }

    (result, removed)
}

/// Truncate to at most `max_chars` characters at a whitespace boundary.
fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return (text.to_string(), false);
    };
    let head = &text[..cut];
    let end = head.rfind(char::is_whitespace).unwrap_or(cut);
    (format!("{}…[TRUNCATED]", &text[..end]), true)
}

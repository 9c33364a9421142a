use std::sync::LazyLock;

use regex::Regex;

static BLANK_LINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalise extracted text before analysis.
///
/// Unifies line endings, strips control characters (keeping `\n` and `\t`),
/// trims trailing whitespace per line, collapses runs of blank lines to one
/// and trims the whole text. Everything else is preserved, including
/// typographic punctuation and non-Latin scripts.
pub fn normalize_extracted_text(raw: &str) -> String {
    let unified = raw
        .trim_start_matches('\u{FEFF}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let lines: Vec<String> = unified
        .split('\n')
        .map(|line| {
            line.chars()
                .filter(|c| *c == '\t' || !c.is_control())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect();

    BLANK_LINE_RUNS
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_bytes() {
        let clean = normalize_extracted_text("Employer: Acme\x00 Sdn Bhd");
        assert_eq!(clean, "Employer: Acme Sdn Bhd");
    }

    #[test]
    fn strips_control_characters_keeps_tabs() {
        let clean = normalize_extracted_text("Salary:\tRM2,000\x01\x02\x07\nDate: 2024-01-15");
        assert_eq!(clean, "Salary:\tRM2,000\nDate: 2024-01-15");
    }

    #[test]
    fn unifies_line_endings() {
        assert_eq!(normalize_extracted_text("a\r\nb\rc\n"), "a\nb\nc");
    }

    #[test]
    fn collapses_blank_line_runs_to_one() {
        let raw = "Clause 1\n\n\n\nClause 2\n\nClause 3\n \n\t\n\nClause 4";
        assert_eq!(
            normalize_extracted_text(raw),
            "Clause 1\n\nClause 2\n\nClause 3\n\nClause 4"
        );
    }

    #[test]
    fn trims_trailing_whitespace_keeps_indentation() {
        let raw = "  (a) first limb   \n  (b) second limb\t";
        assert_eq!(normalize_extracted_text(raw), "(a) first limb\n  (b) second limb");
    }

    #[test]
    fn drops_byte_order_mark() {
        assert_eq!(normalize_extracted_text("\u{FEFF}Lease"), "Lease");
    }

    #[test]
    fn preserves_typographic_punctuation_and_scripts() {
        let raw = "« Loyer » – 1 200 € payable d’avance; 租金 ✓";
        assert_eq!(normalize_extracted_text(raw), raw);
    }

    #[test]
    fn empty_and_control_only_input() {
        assert_eq!(normalize_extracted_text(""), "");
        assert_eq!(normalize_extracted_text("\x00\x01\x02"), "");
    }
}

use super::types::{AnalysisResult, Clause, RiskTier, Summary};
use super::ErrorKind;

/// Count clauses per tier. Pure; the only source of summary numbers.
pub fn summarize(clauses: &[Clause]) -> Summary {
    clauses.iter().fold(Summary::default(), |mut summary, clause| {
        match clause.risk {
            RiskTier::Critical => summary.critical_issues += 1,
            RiskTier::Caution => summary.areas_for_caution += 1,
            RiskTier::Standard => summary.standard_count += 1,
        }
        summary
    })
}

/// Assemble a successful result. An empty clause list is a valid outcome.
pub fn aggregate(clauses: Vec<Clause>, document_text: &str) -> AnalysisResult {
    AnalysisResult {
        summary: summarize(&clauses),
        clauses,
        document_text: document_text.to_string(),
        error: None,
        error_kind: None,
    }
}

impl AnalysisResult {
    /// Uniform failure shape: no clauses, zero counts, `error` set.
    pub fn failure(kind: ErrorKind, message: impl Into<String>, document_text: &str) -> Self {
        Self {
            summary: Summary::default(),
            clauses: Vec::new(),
            document_text: document_text.to_string(),
            error: Some(message.into()),
            error_kind: Some(kind),
        }
    }

    /// Clauses ordered Critical, Caution, Standard. Stable within a tier;
    /// the canonical order in `clauses` is left alone.
    pub fn by_severity(&self) -> Vec<&Clause> {
        let mut view: Vec<&Clause> = self.clauses.iter().collect();
        view.sort_by_key(|c| c.risk.severity_rank());
        view
    }

    /// Clauses that can be highlighted in `document_text`, with the text
    /// their span covers.
    pub fn highlightable(&self) -> impl Iterator<Item = (&Clause, &str)> {
        self.clauses
            .iter()
            .filter_map(|c| Some((c, c.span?.slice(&self.document_text)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analysis::types::Span;

    fn clause(title: &str, risk: RiskTier, span: Option<Span>) -> Clause {
        Clause {
            title: title.into(),
            original_text: String::new(),
            risk,
            explanation: String::new(),
            why_it_matters: String::new(),
            suggestion: String::new(),
            span,
        }
    }

    fn mixed() -> Vec<Clause> {
        vec![
            clause("a", RiskTier::Standard, None),
            clause("b", RiskTier::Critical, Some(Span { start: 0, end: 1 })),
            clause("c", RiskTier::Caution, None),
            clause("d", RiskTier::Critical, Some(Span { start: 2, end: 3 })),
            clause("e", RiskTier::Caution, Some(Span { start: 4, end: 5 })),
        ]
    }

    #[test]
    fn counts_each_tier() {
        let summary = summarize(&mixed());
        assert_eq!(summary.critical_issues, 2);
        assert_eq!(summary.areas_for_caution, 2);
        assert_eq!(summary.standard_count, 1);
    }

    #[test]
    fn summary_is_idempotent() {
        let clauses = mixed();
        let first = aggregate(clauses.clone(), "doc");
        let second = aggregate(clauses, "doc");
        assert_eq!(first.summary, second.summary);
        assert_eq!(summarize(&first.clauses), first.summary);
    }

    #[test]
    fn empty_clause_list_is_valid_success() {
        let result = aggregate(Vec::new(), "Nothing to see.");
        assert_eq!(result.summary, Summary::default());
        assert!(!result.is_error());
        assert_eq!(result.document_text, "Nothing to see.");
    }

    #[test]
    fn document_text_is_carried_unchanged() {
        let text = "  Clause 1.\r\n\tClause 2.  ";
        assert_eq!(aggregate(mixed(), text).document_text, text);
    }

    #[test]
    fn failure_has_zero_counts_and_kind() {
        let result = AnalysisResult::failure(ErrorKind::UnparseableResponse, "UnparseableResponse", "doc");
        assert!(result.clauses.is_empty());
        assert_eq!(result.summary, Summary::default());
        assert_eq!(result.error.as_deref(), Some("UnparseableResponse"));
        assert_eq!(result.error_kind, Some(ErrorKind::UnparseableResponse));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["errorKind"], "UnparseableResponse");
        assert_eq!(value["clauses"], serde_json::json!([]));
    }

    #[test]
    fn severity_view_is_stable_and_non_mutating() {
        let result = aggregate(mixed(), "doc");
        let titles: Vec<&str> = result.by_severity().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "d", "c", "e", "a"]);

        let again: Vec<&str> = result.by_severity().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, again);

        let canonical: Vec<&str> = result.clauses.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(canonical, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn highlightable_skips_unaligned() {
        let result = aggregate(mixed(), "b d e");
        let pairs: Vec<(&str, &str)> = result
            .highlightable()
            .map(|(c, text)| (c.title.as_str(), text))
            .collect();
        assert_eq!(pairs, vec![("b", "b"), ("d", "d"), ("e", "e")]);
    }

    #[test]
    fn highlightable_skips_spans_past_the_text() {
        let result = aggregate(mixed(), "b");
        let titles: Vec<&str> = result.highlightable().map(|(c, _)| c.title.as_str()).collect();
        assert_eq!(titles, vec!["b"]);
    }
}

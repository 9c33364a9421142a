use super::prompt::{build_clause_prompt, CLAUSE_SYSTEM_PROMPT};
use super::sanitize::sanitize_for_model;
use super::types::{CompletionService, ContractKind};
use super::AnalysisError;

/// Total attempts for one classification call (first try + one retry).
const MAX_ATTEMPTS: usize = 2;

/// Opaque model reply, not yet parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawModelResponse {
    pub text: String,
    pub attempts: usize,
    /// Prompt actually sent, kept for diagnostic dumps.
    pub prompt: String,
}

/// Builds the classification prompt and invokes the completion service.
pub struct ClauseRequester<'a> {
    service: &'a dyn CompletionService,
}

impl<'a> ClauseRequester<'a> {
    pub fn new(service: &'a dyn CompletionService) -> Self {
        Self { service }
    }

    /// Ask the completion service to segment and label `document_text`.
    ///
    /// Empty input fails with `EmptyDocument` before any call is made. Only
    /// transport failures are retried; a reply that arrives is returned as is.
    pub fn classify(
        &self,
        document_text: &str,
        kind: ContractKind,
        reference_context: Option<&str>,
        analysis_id: &str,
    ) -> Result<RawModelResponse, AnalysisError> {
        if document_text.trim().is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }

        let outbound = sanitize_for_model(document_text, analysis_id);
        if outbound.trim().is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }

        let prompt = build_clause_prompt(&outbound, kind, reference_context);
        let mut last_error: Option<AnalysisError> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.service.complete(&prompt, CLAUSE_SYSTEM_PROMPT) {
                Ok(text) => {
                    tracing::debug!(
                        analysis_id = %analysis_id,
                        backend = self.service.backend(),
                        attempt,
                        response_len = text.len(),
                        "Completion service replied"
                    );
                    return Ok(RawModelResponse {
                        text,
                        attempts: attempt,
                        prompt,
                    });
                }
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    tracing::warn!(
                        analysis_id = %analysis_id,
                        backend = self.service.backend(),
                        attempt,
                        error = %e,
                        "Completion call failed, retrying"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(unavailable(attempt, Some(e))),
            }
        }

        Err(unavailable(MAX_ATTEMPTS, last_error))
    }
}

fn unavailable(attempts: usize, last_error: Option<AnalysisError>) -> AnalysisError {
    AnalysisError::ServiceUnavailable {
        attempts,
        last_error: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt was made".into()),
    }
}

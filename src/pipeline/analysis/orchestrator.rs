use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::aggregate::aggregate;
use super::aligner::align;
use super::normalizer::normalize;
use super::requester::ClauseRequester;
use super::types::{AnalysisResult, CompletionService, ContractKind};
use super::AnalysisError;
use crate::pipeline::diagnostic::{
    dump_dir_for, dump_json, dump_text, PROMPT_FILE, RAW_RESPONSE_FILE, RESULT_FILE,
};
use crate::pipeline::extraction::Document;

/// One document to analyze, with the context that shapes the prompt.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub document: Document,
    pub kind: ContractKind,
    pub reference_context: Option<String>,
}

impl AnalysisRequest {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            kind: ContractKind::default(),
            reference_context: None,
        }
    }

    pub fn with_kind(mut self, kind: ContractKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_reference_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.reference_context = (!context.trim().is_empty()).then_some(context);
        self
    }
}

/// Orchestrates the clause analysis pipeline:
/// classify → normalize → align → aggregate
pub struct ClauseAnalyzer {
    service: Box<dyn CompletionService + Send + Sync>,
    dump_dir: Option<PathBuf>,
}

impl ClauseAnalyzer {
    pub fn new(service: Box<dyn CompletionService + Send + Sync>) -> Self {
        Self {
            service,
            dump_dir: None,
        }
    }

    /// Write prompt, raw reply and result of every analysis under `dir`.
    pub fn with_dump_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dump_dir = dir;
        self
    }

    pub fn backend(&self) -> &str {
        self.service.backend()
    }

    /// Run the full pipeline. Failures come back as a result with `error` set.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let analysis_id = Uuid::new_v4();
        let document_text = request.document.text.as_str();
        let _span = tracing::info_span!(
            "analyze",
            analysis_id = %analysis_id,
            backend = self.service.backend(),
            kind = request.kind.as_str(),
            source_format = request.document.source_format.as_str(),
        )
        .entered();

        let dump = self
            .dump_dir
            .as_deref()
            .and_then(|base| dump_dir_for(base, &analysis_id));

        let result = match self.run(request, &analysis_id, dump.as_deref()) {
            Ok(result) => {
                tracing::info!(
                    clauses = result.clauses.len(),
                    critical = result.summary.critical_issues,
                    caution = result.summary.areas_for_caution,
                    aligned = result.highlightable().count(),
                    "Analysis complete"
                );
                result
            }
            Err(e) => failure_result(&e, document_text),
        };

        if let Some(dir) = dump.as_deref() {
            dump_json(dir, RESULT_FILE, &result);
        }
        result
    }

    /// Analyze caller-supplied text with default request settings.
    pub fn analyze_text(&self, text: &str) -> AnalysisResult {
        self.analyze(&AnalysisRequest::new(Document::from_text(text)))
    }

    fn run(
        &self,
        request: &AnalysisRequest,
        analysis_id: &Uuid,
        dump: Option<&Path>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let document_text = request.document.text.as_str();
        let requester = ClauseRequester::new(&*self.service);

        let raw = requester.classify(
            document_text,
            request.kind,
            request.reference_context.as_deref(),
            &analysis_id.to_string(),
        )?;

        if let Some(dir) = dump {
            dump_text(dir, PROMPT_FILE, &raw.prompt);
            dump_text(dir, RAW_RESPONSE_FILE, &raw.text);
        }

        normalize_and_align(&raw.text, document_text)
    }
}

/// Run normalize → align → aggregate on a reply captured earlier.
///
/// No completion service is involved, so the only failures are
/// `UnparseableResponse` and `ModelReportedError`.
pub fn replay(raw_response: &str, document_text: &str) -> AnalysisResult {
    match normalize_and_align(raw_response, document_text) {
        Ok(result) => result,
        Err(e) => failure_result(&e, document_text),
    }
}

fn normalize_and_align(raw: &str, document_text: &str) -> Result<AnalysisResult, AnalysisError> {
    let clauses = normalize(raw)?;
    let clauses = align(clauses, document_text);
    Ok(aggregate(clauses, document_text))
}

fn failure_result(error: &AnalysisError, document_text: &str) -> AnalysisResult {
    match error {
        AnalysisError::UnparseableResponse { reason, raw } => {
            tracing::warn!(reason = %reason, raw_len = raw.len(), "Model reply could not be parsed");
            tracing::debug!(raw = %raw, "Unparseable model reply");
        }
        AnalysisError::ModelReportedError(message) => {
            tracing::info!(message = %message, "Model declined the document");
        }
        AnalysisError::EmptyDocument => {
            tracing::info!("Document is empty, nothing to analyze");
        }
        other => {
            tracing::warn!(error = %other, "Analysis failed");
        }
    }
    AnalysisResult::failure(error.kind(), error.result_message(), document_text)
}

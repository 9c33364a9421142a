pub mod types;
pub mod prompt;
pub mod sanitize;
pub mod requester;
pub mod normalizer;
pub mod aligner;
pub mod aggregate;
pub mod orchestrator;
pub mod ollama;
pub mod gemini;
pub mod mock;

pub use types::*;
pub use prompt::*;
pub use requester::*;
pub use normalizer::*;
pub use aligner::*;
pub use aggregate::*;
pub use orchestrator::*;
pub use ollama::*;
pub use gemini::*;
pub use mock::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Document text is empty")]
    EmptyDocument,

    #[error("Completion service is not reachable at {0}")]
    ServiceConnection(String),

    #[error("Completion service returned error (status {status}): {body}")]
    ServiceError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Could not decode completion service envelope: {0}")]
    ResponseParsing(String),

    #[error("Completion service unavailable after {attempts} attempt(s): {last_error}")]
    ServiceUnavailable { attempts: usize, last_error: String },

    #[error("Model reply is not valid structured data: {reason}")]
    UnparseableResponse { reason: String, raw: String },

    #[error("Model reported: {0}")]
    ModelReportedError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result-level failure classes carried in `AnalysisResult.errorKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    EmptyDocument,
    ServiceUnavailable,
    UnparseableResponse,
    ModelReportedError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyDocument => "EmptyDocument",
            Self::ServiceUnavailable => "ServiceUnavailable",
            Self::UnparseableResponse => "UnparseableResponse",
            Self::ModelReportedError => "ModelReportedError",
        }
    }
}

impl AnalysisError {
    /// Transport failures worth a second attempt. 4xx other than 429 is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ServiceConnection(_) | Self::HttpClient(_) => true,
            Self::ServiceError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyDocument => ErrorKind::EmptyDocument,
            Self::UnparseableResponse { .. } => ErrorKind::UnparseableResponse,
            Self::ModelReportedError(_) => ErrorKind::ModelReportedError,
            Self::ServiceConnection(_)
            | Self::ServiceError { .. }
            | Self::HttpClient(_)
            | Self::ResponseParsing(_)
            | Self::ServiceUnavailable { .. }
            | Self::Config(_) => ErrorKind::ServiceUnavailable,
        }
    }

    /// String placed in `AnalysisResult.error`. Never contains raw model output.
    pub fn result_message(&self) -> String {
        match self {
            Self::ModelReportedError(message) => message.clone(),
            other => other.kind().as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_retryable() {
        assert!(AnalysisError::ServiceConnection("http://x".into()).is_retryable());
        assert!(AnalysisError::HttpClient("timeout".into()).is_retryable());
        assert!(AnalysisError::ServiceError { status: 503, body: String::new() }.is_retryable());
        assert!(AnalysisError::ServiceError { status: 429, body: String::new() }.is_retryable());
    }

    #[test]
    fn client_and_content_errors_are_not_retryable() {
        assert!(!AnalysisError::ServiceError { status: 400, body: String::new() }.is_retryable());
        assert!(!AnalysisError::EmptyDocument.is_retryable());
        assert!(!AnalysisError::UnparseableResponse {
            reason: "eof".into(),
            raw: "{".into()
        }
        .is_retryable());
        assert!(!AnalysisError::ModelReportedError("not a contract".into()).is_retryable());
    }

    #[test]
    fn result_message_hides_raw_reply() {
        let err = AnalysisError::UnparseableResponse {
            reason: "expected value".into(),
            raw: "secret raw text".into(),
        };
        assert_eq!(err.result_message(), "UnparseableResponse");
        assert!(!err.result_message().contains("secret"));
    }

    #[test]
    fn model_reported_error_uses_model_message() {
        let err = AnalysisError::ModelReportedError("This is a recipe, not a contract.".into());
        assert_eq!(err.kind(), ErrorKind::ModelReportedError);
        assert_eq!(err.result_message(), "This is a recipe, not a contract.");
    }

    #[test]
    fn transport_failures_collapse_to_service_unavailable() {
        let err = AnalysisError::ServiceUnavailable {
            attempts: 2,
            last_error: "refused".into(),
        };
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(err.result_message(), "ServiceUnavailable");
        assert_eq!(AnalysisError::EmptyDocument.result_message(), "EmptyDocument");
    }
}

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::{AnalysisError, ErrorKind};

/// Closed risk classification of a clause.
///
/// Serialized as the legacy colour strings consumers already understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "Red")]
    Critical,
    #[serde(rename = "Yellow")]
    Caution,
    #[serde(rename = "Green")]
    Standard,
}

impl RiskTier {
    pub fn as_color(&self) -> &'static str {
        match self {
            Self::Critical => "Red",
            Self::Caution => "Yellow",
            Self::Standard => "Green",
        }
    }

    /// Sort key for severity views: Critical first.
    pub fn severity_rank(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Caution => 1,
            Self::Standard => 2,
        }
    }
}

/// Character range of a clause inside the document text.
///
/// Offsets count `char`s, not bytes, and always satisfy
/// `start < end <= text.chars().count()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Span for the byte range `start..end` of `text`. `None` unless both
    /// ends are in bounds, on char boundaries, and the range is non-empty.
    pub(crate) fn from_byte_range(text: &str, start: usize, end: usize) -> Option<Self> {
        let before = text.get(..start)?;
        let covered = text.get(start..end).filter(|c| !c.is_empty())?;
        let start = before.chars().count();
        Some(Self {
            start,
            end: start + covered.chars().count(),
        })
    }

    /// Byte range of the span in `text`, or `None` if it does not fit.
    pub fn byte_range(&self, text: &str) -> Option<Range<usize>> {
        if self.start >= self.end {
            return None;
        }
        let mut bounds = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()));
        let start = bounds.nth(self.start)?;
        let end = bounds.nth(self.end - self.start - 1)?;
        Some(start..end)
    }

    /// The covered text, or `None` if the span does not fit `text`.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.byte_range(text)?)
    }
}

/// Canonical, normalized clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clause {
    pub title: String,
    pub original_text: String,
    #[serde(rename = "color")]
    pub risk: RiskTier,
    pub explanation: String,
    pub why_it_matters: String,
    pub suggestion: String,
    pub span: Option<Span>,
}

/// Counts derived from the final clause list. Never taken from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub critical_issues: usize,
    pub areas_for_caution: usize,
    pub standard_count: usize,
}

/// Uniform result shape for success and failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: Summary,
    pub clauses: Vec<Clause>,
    pub document_text: String,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl AnalysisResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// What sort of agreement the document is expected to be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    LabourContract,
    TenancyAgreement,
    #[default]
    General,
}

impl ContractKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LabourContract => "labour_contract",
            Self::TenancyAgreement => "tenancy_agreement",
            Self::General => "general",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "labour" | "labor" | "labour_contract" | "labor_contract" | "employment" => {
                Some(Self::LabourContract)
            }
            "tenancy" | "tenancy_agreement" | "lease" | "rental" => Some(Self::TenancyAgreement),
            "general" | "contract" => Some(Self::General),
            _ => None,
        }
    }
}

/// Text-completion service abstraction (allows mocking).
pub trait CompletionService {
    fn complete(&self, prompt: &str, system: &str) -> Result<String, AnalysisError>;

    /// Short backend label for logs.
    fn backend(&self) -> &str;
}

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::types::{Clause, RiskTier};
use super::AnalysisError;

/// Reply that is entirely one fenced block: ```lang ... ```
static WRAPPED_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```[A-Za-z0-9_+.-]*\s*(.*?)\s*```$").unwrap());

/// Opening fence of a reply whose closing fence was cut off.
static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+.-]*").unwrap());

/// First fenced block inside surrounding prose.
static EMBEDDED_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z0-9_+.-]*\s*(.*?)\s*```").unwrap());

/// Risk coercion table. Case-insensitive substring match, first row wins,
/// no match means Standard.
const RISK_RULES: &[(&str, RiskTier)] = &[
    ("red", RiskTier::Critical),
    ("🔴", RiskTier::Critical),
    ("yellow", RiskTier::Caution),
    ("🟡", RiskTier::Caution),
];

/// Untrusted clause exactly as the model sent it. Nothing is validated here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawModelClause {
    pub title: Option<Value>,
    pub original_text: Option<Value>,
    pub color: Option<Value>,
    pub explanation: Option<Value>,
    pub why_it_matters: Option<Value>,
    pub suggestion: Option<Value>,
}

impl RawModelClause {
    /// Pick known fields (and their common spellings) out of a JSON object.
    /// Returns `None` for anything that is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            title: field(obj, &["title", "name", "heading"]),
            original_text: field(obj, &["originalText", "original_text", "clauseText", "text"]),
            color: field(obj, &["color", "colour", "risk", "riskLevel", "risk_level"]),
            explanation: field(obj, &["explanation"]),
            why_it_matters: field(obj, &["whyItMatters", "why_it_matters"]),
            suggestion: field(obj, &["suggestion", "recommendation"]),
        })
    }
}

/// First non-null value among `keys`.
fn field(obj: &Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
        .cloned()
}

/// Parse the model's raw reply into canonical clauses (spans not yet computed).
///
/// Preserves the model's order. Fails with `UnparseableResponse` when the reply
/// is not structured data, or `ModelReportedError` when the model declined.
pub fn normalize(raw: &str) -> Result<Vec<Clause>, AnalysisError> {
    let value: Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(_) => serde_json::from_str(strip_code_fences(raw)).map_err(|e| {
            AnalysisError::UnparseableResponse {
                reason: e.to_string(),
                raw: raw.to_string(),
            }
        })?,
    };

    let entries = match value {
        Value::Object(mut obj) => {
            if let Some(message) = reported_error(&obj) {
                return Err(AnalysisError::ModelReportedError(message));
            }
            let key = obj.keys().find(|k| k.eq_ignore_ascii_case("clauses")).cloned();
            match key.and_then(|k| obj.remove(&k)) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(AnalysisError::UnparseableResponse {
                        reason: format!("\"clauses\" is {}, expected an array", json_type(&other)),
                        raw: raw.to_string(),
                    })
                }
            }
        }
        Value::Array(items) => items,
        other => {
            return Err(AnalysisError::UnparseableResponse {
                reason: format!("expected a JSON object, found {}", json_type(&other)),
                raw: raw.to_string(),
            })
        }
    };

    let clauses = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match RawModelClause::from_value(entry) {
            Some(raw_clause) => Some(normalize_clause(raw_clause)),
            None => {
                tracing::debug!(index, kind = json_type(entry), "Skipping non-object clause entry");
                None
            }
        })
        .collect();

    Ok(clauses)
}

/// Coerce one raw clause into the canonical type. Infallible by construction.
pub fn normalize_clause(raw: RawModelClause) -> Clause {
    Clause {
        title: coerce_text(raw.title.as_ref()),
        original_text: coerce_text(raw.original_text.as_ref()),
        risk: coerce_risk(raw.color.as_ref().and_then(Value::as_str)),
        explanation: coerce_text(raw.explanation.as_ref()),
        why_it_matters: coerce_text(raw.why_it_matters.as_ref()),
        suggestion: coerce_text(raw.suggestion.as_ref()),
        span: None,
    }
}

/// Map any risk label onto the closed tier set.
pub fn coerce_risk(label: Option<&str>) -> RiskTier {
    let Some(label) = label else {
        return RiskTier::Standard;
    };
    let lower = label.to_lowercase();
    RISK_RULES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, tier)| *tier)
        .unwrap_or(RiskTier::Standard)
}

/// Strings as is, scalars stringified, everything else empty.
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// The model's own refusal, if any. `null`, `false` and `""` do not count.
fn reported_error(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// Remove Markdown code fences around the JSON payload.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(body) = WRAPPED_FENCE.captures(trimmed).and_then(|c| c.get(1)) {
        return body.as_str();
    }

    // A reply that already opens as JSON may quote fences inside its strings.
    if !trimmed.starts_with(['{', '[']) {
        if let Some(body) = EMBEDDED_FENCE.captures(trimmed).and_then(|c| c.get(1)) {
            return body.as_str();
        }
    }

    if let Some(open) = OPENING_FENCE.find(trimmed) {
        return trimmed[open.end()..].trim();
    }

    trimmed.strip_suffix("```").map(str::trim_end).unwrap_or(trimmed)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

use super::types::ContractKind;

pub const CLAUSE_SYSTEM_PROMPT: &str = r#"
You are a contract review assistant. Your ONLY role is to split the contract
text you are given into its clauses and label the risk each clause carries
for the person signing it.

RULES (ABSOLUTE, NO EXCEPTIONS):
1. Segment the WHOLE document into clauses. Do NOT summarize, skip or merge clauses.
2. Assign exactly ONE color per clause: "Red" (critical risk), "Yellow" (needs caution)
   or "Green" (standard).
3. Copy "originalText" VERBATIM from the document: same words, same punctuation.
   Never paraphrase, shorten or correct it.
4. Respond with a single valid JSON object and nothing else. No Markdown, no prose.
5. If the text is not a contract or agreement, respond with {"error": "<short reason>"}.
"#;

/// Role line per contract kind.
fn role_line(kind: ContractKind) -> &'static str {
    match kind {
        ContractKind::LabourContract => {
            "The document is an employment (labour) contract. Judge clauses against \
             common statutory employment protections: working hours, wages, leave, \
             termination and notice."
        }
        ContractKind::TenancyAgreement => {
            "The document is a tenancy agreement. Judge clauses from the tenant's side: \
             deposits, rent increases, repairs, entry rights and termination."
        }
        ContractKind::General => {
            "The document is a contract or agreement. Judge clauses from the side of the \
             party receiving it for signature."
        }
    }
}

/// Build the clause classification prompt for one document.
pub fn build_clause_prompt(
    document_text: &str,
    kind: ContractKind,
    reference_context: Option<&str>,
) -> String {
    let role = role_line(kind);
    let context = match reference_context.map(str::trim) {
        Some(ctx) if !ctx.is_empty() => ctx,
        _ => "No reference context was supplied for this document.",
    };

    format!(
        r#"{role}

<contract_text>
{document_text}
</contract_text>

<reference_context>
{context}
</reference_context>

Return one JSON object with this exact structure:

{{
  "clauses": [
    {{
      "title": "<a concise, descriptive title for the clause>",
      "originalText": "<the exact, verbatim text of the clause from the document>",
      "color": "Red | Yellow | Green",
      "explanation": "<a simple, clear explanation of what the clause means>",
      "whyItMatters": "<the potential impact or risk for the signer>",
      "suggestion": "<an actionable suggestion, e.g. 'Negotiate to change...', 'This is a standard clause.'>"
    }}
  ]
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_document_text() {
        let prompt = build_clause_prompt("The tenant shall pay RM500.", ContractKind::General, None);
        assert!(prompt.contains("The tenant shall pay RM500."));
        assert!(prompt.contains("<contract_text>"));
        assert!(prompt.contains("</contract_text>"));
    }

    #[test]
    fn prompt_requests_verbatim_structured_clauses() {
        let prompt = build_clause_prompt("text", ContractKind::General, None);
        assert!(prompt.contains("\"originalText\""));
        assert!(prompt.contains("verbatim"));
        assert!(prompt.contains("Red | Yellow | Green"));
        assert!(!prompt.contains("criticalIssues"));
    }

    #[test]
    fn kind_selects_role_line() {
        let labour = build_clause_prompt("text", ContractKind::LabourContract, None);
        let tenancy = build_clause_prompt("text", ContractKind::TenancyAgreement, None);
        assert!(labour.contains("employment"));
        assert!(tenancy.contains("tenancy agreement"));
    }

    #[test]
    fn reference_context_embedded_when_present() {
        let prompt = build_clause_prompt(
            "text",
            ContractKind::LabourContract,
            Some("Employment Act 1955, s.60A: max 45 hours/week"),
        );
        assert!(prompt.contains("s.60A"));
        assert!(!prompt.contains("No reference context"));
    }

    #[test]
    fn blank_reference_context_falls_back() {
        let prompt = build_clause_prompt("text", ContractKind::General, Some("   "));
        assert!(prompt.contains("No reference context was supplied"));
    }

    #[test]
    fn system_prompt_enforces_segmentation_and_json() {
        assert!(CLAUSE_SYSTEM_PROMPT.contains("WHOLE document"));
        assert!(CLAUSE_SYSTEM_PROMPT.contains("VERBATIM"));
        assert!(CLAUSE_SYSTEM_PROMPT.contains("valid JSON"));
        assert!(CLAUSE_SYSTEM_PROMPT.contains("exactly ONE color"));
    }
}

use super::*;
use crate::audit::{AuditStatus, UNSPECIFIED_REASON};

#[test]
fn test_json_span_outermost() {
    assert_eq!(json_span("x {\"a\": 1} y"), Some("{\"a\": 1}"));
    // First `{` to last `}`, nested or not.
    assert_eq!(
        json_span("{\"a\": {\"b\": 2}}"),
        Some("{\"a\": {\"b\": 2}}")
    );
    assert_eq!(json_span("no braces here"), None);
    // A closing brace before the first opening one is not a span.
    assert_eq!(json_span("} {"), None);
}

#[test]
fn test_extract_json_strips_json_fence() {
    let text = "```json\n{\"status\":\"APPROVED\",\"motivo\":\"ok\"}\n```";
    assert_eq!(
        extract_json(text),
        "{\"status\":\"APPROVED\",\"motivo\":\"ok\"}"
    );
}

#[test]
fn test_extract_json_strips_plain_fence() {
    let text = "```\n{\"status\":\"REJECTED\",\"motivo\":\"blurry\"}\n```";
    assert_eq!(
        extract_json(text),
        "{\"status\":\"REJECTED\",\"motivo\":\"blurry\"}"
    );
}

#[test]
fn test_extract_json_ignores_surrounding_prose() {
    let text = "Sure! Here is the verdict: {\"status\":\"REJECTED\",\"motivo\":\"x\"} hope that helps";
    assert_eq!(extract_json(text), "{\"status\":\"REJECTED\",\"motivo\":\"x\"}");
}

#[test]
fn test_extract_json_without_braces_returns_trimmed_input() {
    assert_eq!(extract_json("  not json at all  "), "not json at all");
}

#[test]
fn test_normalize_status_accepts_any_case() {
    assert_eq!(
        normalize_status("APPROVED", "legible").status,
        AuditStatus::Approved
    );
    assert_eq!(
        normalize_status("approved", "legible").status,
        AuditStatus::Approved
    );
    assert_eq!(
        normalize_status("Rejected", "blurry").status,
        AuditStatus::Rejected
    );
}

#[test]
fn test_normalize_status_unknown_collapses_to_rejected() {
    let verdict = normalize_status("MAYBE", "could not tell");

    assert_eq!(verdict.status, AuditStatus::Rejected);
    assert!(verdict.reason.contains("Indeterminate status 'MAYBE'"));
    assert!(verdict.reason.contains("could not tell"));
}

#[test]
fn test_normalize_status_blank_reason_gets_placeholder() {
    let verdict = normalize_status("APPROVED", "   ");
    assert_eq!(verdict.reason, UNSPECIFIED_REASON);
}

#[test]
fn test_structured_verdict_requires_both_fields() {
    assert!(structured_verdict("{\"status\":\"APPROVED\"}").is_err());
    assert!(structured_verdict("{\"motivo\":\"ok\"}").is_err());

    let verdict =
        structured_verdict("{\"status\":\"APPROVED\",\"motivo\":\"ok\"}").expect("should parse");
    assert_eq!(verdict.status, AuditStatus::Approved);
    assert_eq!(verdict.reason, "ok");
}

#[test]
fn test_strict_reply_verdict_happy_path() {
    let verdict =
        strict_reply_verdict("```json\n{\"status\":\"APPROVED\",\"motivo\":\"all legible\"}\n```");
    assert_eq!(verdict.status, AuditStatus::Approved);
    assert_eq!(verdict.reason, "all legible");
}

#[test]
fn test_strict_reply_verdict_rejects_unparseable_reply() {
    let verdict = strict_reply_verdict("the model rambled and returned no JSON");

    assert_eq!(verdict.status, AuditStatus::Rejected);
    assert!(verdict.reason.contains("Audit rejected as a precaution"));
}

#[test]
fn test_direct_reply_verdict_reads_structured_reply() {
    let verdict = direct_reply_verdict("{\"status\": \"approved\", \"motivo\": \"label legible\"}");
    assert_eq!(verdict.status, AuditStatus::Approved);
    assert_eq!(verdict.reason, "label legible");
}

#[test]
fn test_direct_reply_verdict_falls_back_to_keywords() {
    // Span parses but lacks `motivo`: fall through to the keyword heuristic
    // over the whole reply.
    let verdict = direct_reply_verdict("produto APROVADO {\"status\": \"APPROVED\"}");
    assert_eq!(verdict.status, AuditStatus::Approved);

    let verdict = direct_reply_verdict("some {fragment} without a verdict");
    assert_eq!(verdict.status, AuditStatus::Rejected);
}

#[test]
fn test_keyword_verdict_approves_only_unambiguous_token() {
    assert_eq!(
        keyword_verdict("O produto foi APROVADO na análise").status,
        AuditStatus::Approved
    );
    // Case-insensitive.
    assert_eq!(keyword_verdict("aprovado").status, AuditStatus::Approved);
    // Both tokens present: ambiguous, reject.
    assert_eq!(
        keyword_verdict("APROVADO? não, REPROVADO").status,
        AuditStatus::Rejected
    );
    assert_eq!(keyword_verdict("REPROVADO").status, AuditStatus::Rejected);
}

#[test]
fn test_keyword_verdict_defaults_to_rejected_with_review_note() {
    let verdict = keyword_verdict("I can see a red can with white lettering.");

    assert_eq!(verdict.status, AuditStatus::Rejected);
    assert!(verdict.reason.contains("red can with white lettering"));
    assert!(verdict.reason.contains("Manual review"));
}

#[test]
fn test_keyword_verdict_empty_reply() {
    let verdict = keyword_verdict("   ");

    assert_eq!(verdict.status, AuditStatus::Rejected);
    assert!(verdict.reason.contains("no analysis"));
}

#[test]
fn test_looks_like_verdict() {
    assert!(looks_like_verdict("{\"status\": \"APPROVED\", \"motivo\": \"ok\"}"));
    assert!(looks_like_verdict("noise {\"status\": \"x\"} noise"));
    assert!(!looks_like_verdict("Refrigerante {Cola} 350ml"));
    assert!(!looks_like_verdict("plain extracted text"));
}

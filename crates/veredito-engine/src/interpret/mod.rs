//! Turning raw model replies into verdicts.
//!
//! Two interpretation paths converge on the same [`Verdict`] type. The
//! structured path extracts a `{status, motivo}` JSON object from the reply
//! (tolerating markdown fences and surrounding prose) and normalizes the
//! status onto the closed verdict set. The keyword path is the fallback for
//! free text and approves only on an unambiguous positive token. On both
//! paths, anything unreadable, ambiguous or unexpected rejects. The audit
//! is fail-closed: a wrong rejection costs a manual review, a wrong
//! approval poisons the catalog.

#[cfg(test)]
mod tests;

use serde::Deserialize;

use crate::audit::Verdict;

/// Rejection used when the remote reply carries no interpretable text.
pub const UNPROCESSABLE_REPLY: &str =
    "Could not process the AI response. Audit rejected as a precaution.";

/// The JSON object the model is instructed to answer with. The `motivo` key
/// is an upstream protocol constant.
#[derive(Debug, Deserialize)]
struct RawReply {
    status: String,
    motivo: String,
}

/// Locates the outermost JSON object span: first `{` to last `}`.
///
/// Deliberately not a balanced-brace scan. Model output wraps the object in
/// prose at worst, it does not emit several objects, and the dumb span rule
/// is immune to braces inside string values.
pub fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start { Some(&text[start..=end]) } else { None }
}

/// Strips markdown code fences and returns the JSON object span, or the
/// trimmed input when no span exists (letting the parse fail with a useful
/// error).
pub fn extract_json(text: &str) -> String {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    match json_span(text) {
        Some(span) => span.trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Collapses a claimed status onto the closed verdict set.
///
/// Only the exact tokens `APPROVED` and `REJECTED` (any case) are accepted.
/// Anything else rejects while keeping the original text, so a reviewer can
/// see what the model actually said.
pub fn normalize_status(status: &str, reason: &str) -> Verdict {
    if status.eq_ignore_ascii_case("APPROVED") {
        Verdict::approved(reason)
    } else if status.eq_ignore_ascii_case("REJECTED") {
        Verdict::rejected(reason)
    } else {
        Verdict::rejected(format!(
            "Indeterminate status '{status}'. Original reason: {reason}"
        ))
    }
}

/// Structured interpretation: the reply must contain a JSON object with
/// both `status` and `motivo`.
pub fn structured_verdict(text: &str) -> Result<Verdict, serde_json::Error> {
    let json = extract_json(text);
    let reply: RawReply = serde_json::from_str(&json)?;
    Ok(normalize_status(&reply.status, &reply.motivo))
}

/// Full strict-path interpretation for the remote provider. Parse failures
/// reject with the error embedded in the reason.
pub fn strict_reply_verdict(text: &str) -> Verdict {
    match structured_verdict(text) {
        Ok(verdict) => verdict,
        Err(e) => Verdict::rejected(format!(
            "Error processing the AI response. Audit rejected as a precaution: {e}"
        )),
    }
}

/// Interpretation for a reply the local model produced directly, for the
/// case where it emits a structured verdict instead of extracted text.
/// Failing the structured parse, falls through to the keyword heuristic
/// rather than rejecting outright.
pub fn direct_reply_verdict(text: &str) -> Verdict {
    match json_span(text) {
        Some(span) => match serde_json::from_str::<RawReply>(span) {
            Ok(reply) => normalize_status(&reply.status, &reply.motivo),
            Err(_) => keyword_verdict(text),
        },
        None => keyword_verdict(text),
    }
}

/// Free-text heuristic of last resort. Approves only on the literal token
/// "APROVADO" unaccompanied by "REPROVADO"; the tokens are the catalog
/// system's own vocabulary, which is what the model parrots when prompted
/// with it. Every other shape of answer rejects.
pub fn keyword_verdict(text: &str) -> Verdict {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Verdict::rejected("The model returned no analysis of the image.");
    }

    let upper = trimmed.to_uppercase();
    if upper.contains("APROVADO") && !upper.contains("REPROVADO") {
        return Verdict::approved(format!("Model approved. Details: {trimmed}"));
    }

    Verdict::rejected(format!(
        "The model reported the following about the image:\n\n{trimmed}\n\n\
         Rejected as a precaution. Manual review is needed to confirm the \
         extracted data matches the claim."
    ))
}

/// Returns `true` if a reply looks like a structured verdict rather than
/// extracted label text.
pub fn looks_like_verdict(text: &str) -> bool {
    json_span(text).is_some_and(|span| span.contains("\"status\""))
}

use serde::Serialize;
use serde_json::Value;

use veredito::audit::{AuditOutcome, Verdict};

#[derive(Serialize, Debug, Clone)]
pub struct AuditResponse {
    pub request_id: i64,
    pub verdict: Verdict,
    pub audited_at: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_payload: Option<Value>,
}

impl From<AuditOutcome> for AuditResponse {
    fn from(outcome: AuditOutcome) -> Self {
        Self {
            request_id: outcome.request_id,
            verdict: outcome.verdict,
            audited_at: outcome.audited_at.to_rfc3339(),
            message: outcome.message,
            approval_payload: outcome.approval_payload,
        }
    }
}

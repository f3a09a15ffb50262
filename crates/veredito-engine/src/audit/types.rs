use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::AuditError;

/// Fallback justification when a verdict arrives without one.
pub const UNSPECIFIED_REASON: &str = "Reason not specified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Final audit decision. Closed set: every audit ends in one of these two
/// states, no third value is ever produced or persisted.
pub enum AuditStatus {
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "REJECTED")]
    Rejected,
}

impl AuditStatus {
    /// Returns the wire-format token for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Approved => "APPROVED",
            AuditStatus::Rejected => "REJECTED",
        }
    }

    /// Returns `true` if approved.
    pub fn is_approved(&self) -> bool {
        matches!(self, AuditStatus::Approved)
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// The audit decision plus its human-readable justification.
///
/// The reason is never empty: constructors substitute
/// [`UNSPECIFIED_REASON`] for blank input, so downstream consumers can rely
/// on having something to show a reviewer.
pub struct Verdict {
    pub status: AuditStatus,
    pub reason: String,
}

impl Verdict {
    fn new(status: AuditStatus, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            UNSPECIFIED_REASON.to_string()
        } else {
            reason
        };
        Self { status, reason }
    }

    /// Creates an approved verdict.
    pub fn approved(reason: impl Into<String>) -> Self {
        Self::new(AuditStatus::Approved, reason)
    }

    /// Creates a rejected verdict.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::new(AuditStatus::Rejected, reason)
    }

    /// Rejection produced when an audit attempt dies on an internal error
    /// (transport failure, timeout, malformed upstream reply). The detail is
    /// embedded in the reason so the failure stays diagnosable.
    pub fn processing_failure(detail: impl std::fmt::Display) -> Self {
        Self::rejected(format!("Audit rejected due to a processing error: {detail}"))
    }

    /// Returns `true` if the product was approved.
    pub fn is_approved(&self) -> bool {
        self.status.is_approved()
    }
}

/// One claimed barcode, as submitted by the upstream workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barcode {
    /// Digit string as printed on the packaging.
    pub code: String,
    /// Symbology label (EAN-13, DUN-14, ...). Informational only.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Barcode {
    pub fn new(code: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            kind: kind.into(),
        }
    }
}

/// The product identity the photographs are audited against.
///
/// Immutable once constructed; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Upstream request identifier.
    pub id: i64,
    /// Claimed product description, free text.
    pub description: String,
    /// Claimed barcodes, in submission order.
    pub barcodes: Vec<Barcode>,
}

impl Claim {
    pub fn new(id: i64, description: impl Into<String>, barcodes: Vec<Barcode>) -> Self {
        Self {
            id,
            description: description.into(),
            barcodes,
        }
    }

    /// The barcode the offline matcher scores against: the first one
    /// submitted.
    pub fn primary_barcode(&self) -> Option<&Barcode> {
        self.barcodes.first()
    }

    /// Extracts the claim fields from the full upstream submission document.
    ///
    /// The document nests them as `IdSolicitacao` (root),
    /// `Precadastro.DescricaoProduto` and the root-level
    /// `listEmbalagemSolicitacao` array. Field names are upstream protocol
    /// constants. Entries without a barcode value are skipped.
    pub fn from_submission(document: &Value) -> Result<Self, AuditError> {
        let id = integer_at(document, "IdSolicitacao").ok_or_else(|| {
            AuditError::InvalidSubmission {
                detail: "missing or non-numeric IdSolicitacao".to_string(),
            }
        })?;

        let description = document
            .get("Precadastro")
            .and_then(|p| p.get("DescricaoProduto"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AuditError::InvalidSubmission {
                detail: "missing Precadastro.DescricaoProduto".to_string(),
            })?;

        let barcodes = document
            .get("listEmbalagemSolicitacao")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let code = text_at(entry, "CodigoBarras")?;
                        if code.trim().is_empty() {
                            return None;
                        }
                        let kind = text_at(entry, "TipoCodigoBarras").unwrap_or_default();
                        Some(Barcode::new(code, kind))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self::new(id, description, barcodes))
    }
}

/// Reads an integer field that the upstream system serializes either as a
/// number or as a numeric string.
fn integer_at(document: &Value, key: &str) -> Option<i64> {
    match document.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a textual field, accepting numbers (barcodes are sometimes sent
/// unquoted).
fn text_at(document: &Value, key: &str) -> Option<String> {
    match document.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Ordered photographs for one audit call.
///
/// Order is significant only for diagnostic labeling ("Image 1", "Image 2",
/// ...), never for matching. Owned by the call that produced it; the engine
/// does not retain it.
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    images: Vec<Vec<u8>>,
}

impl ImageSet {
    pub fn new(images: Vec<Vec<u8>>) -> Self {
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Iterates the images in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.images.iter().map(Vec::as_slice)
    }
}

impl From<Vec<Vec<u8>>> for ImageSet {
    fn from(images: Vec<Vec<u8>>) -> Self {
        Self::new(images)
    }
}

/// Result of one full audit run, ready for the HTTP layer to serialize.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    /// Upstream request identifier (`IdSolicitacao`).
    pub request_id: i64,
    /// The decision and its justification.
    pub verdict: Verdict,
    /// When the audit concluded.
    pub audited_at: DateTime<Utc>,
    /// Operator-facing summary line.
    pub message: String,
    /// Assembled approval document. Present only for approved verdicts.
    pub approval_payload: Option<Value>,
}

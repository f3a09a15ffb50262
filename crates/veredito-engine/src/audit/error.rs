use thiserror::Error;

use crate::provider::ProviderError;

/// Errors the audit flow surfaces to its caller.
///
/// Note what is *not* here: provider failures during the audit itself.
/// Those are folded into a rejected [`Verdict`](super::Verdict) by the
/// fail-closed policy and never leave the provider boundary as errors.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("at least one image is required")]
    NoImages,

    #[error("image {index} is empty")]
    EmptyImage { index: usize },

    #[error("invalid submission document: {detail}")]
    InvalidSubmission { detail: String },

    /// The post-approval payload transform failed. There is no safe default
    /// document to fall back to, so this propagates instead of collapsing
    /// into a rejection.
    #[error("approval payload assembly failed: {source}")]
    ApprovalAssembly {
        #[source]
        source: ProviderError,
    },
}

pub type AuditResult<T> = Result<T, AuditError>;

//! Vision providers: the audit capability behind one common contract.
//!
//! Exactly one provider is active per process, chosen from configuration at
//! startup. `audit` is infallible by design: every failure inside a
//! provider folds into a rejected verdict, per the fail-closed policy. The
//! approval transform is the opposite and propagates errors, because a
//! made-up approval document is worse than a failed request.

pub mod error;
pub mod gemini;
pub mod moondream;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{ProviderError, ProviderResult};
pub use gemini::GeminiProvider;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVisionProvider;
pub use moondream::MoondreamProvider;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::audit::{Claim, ImageSet, Verdict};
use crate::config::{Config, ProviderKind};

#[async_trait]
/// The audit capability contract every backend implements.
pub trait VisionProvider: Send + Sync {
    /// Audits the images against the claim.
    ///
    /// Never fails: transport and interpretation errors surface as rejected
    /// verdicts with the diagnostic embedded in the reason.
    async fn audit(&self, images: &ImageSet, claim: &Claim) -> Verdict;

    /// Transforms an approved submission document into the catalog approval
    /// payload.
    async fn assemble_approval(&self, submission: &Value) -> ProviderResult<Value>;

    /// Human-readable provider name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Builds the configured [`VisionProvider`] implementation.
pub fn build_provider(config: &Config) -> ProviderResult<Arc<dyn VisionProvider>> {
    match config.provider {
        ProviderKind::Gemini => Ok(Arc::new(GeminiProvider::new(config.gemini.clone())?)),
        ProviderKind::Moondream => Ok(Arc::new(MoondreamProvider::new(
            config.moondream.clone(),
            config.match_policy,
        )?)),
    }
}

//! Orchestration of one audit call, from raw inputs to an outcome.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use super::error::{AuditError, AuditResult};
use super::types::{AuditOutcome, Claim, ImageSet, Verdict};
use crate::provider::VisionProvider;

/// Drives one audit: input validation, the provider call and, for approved
/// verdicts, approval-payload assembly.
///
/// The engine holds no mutable state; concurrent audits share only the
/// provider behind the `Arc`.
pub struct AuditEngine {
    provider: Arc<dyn VisionProvider>,
}

impl AuditEngine {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Rejects unusable image sets before any provider traffic.
    fn check_images(images: &ImageSet) -> AuditResult<()> {
        if images.is_empty() {
            return Err(AuditError::NoImages);
        }
        for (index, image) in images.iter().enumerate() {
            if image.is_empty() {
                return Err(AuditError::EmptyImage { index: index + 1 });
            }
        }
        Ok(())
    }

    /// Audits a claim against its photographs.
    ///
    /// Provider failures come back as rejected verdicts, not errors; the
    /// only `Err` this returns is for input the audit cannot start on.
    pub async fn audit(&self, images: &ImageSet, claim: &Claim) -> AuditResult<Verdict> {
        Self::check_images(images)?;

        info!(
            request_id = claim.id,
            provider = self.provider.name(),
            image_count = images.len(),
            "auditing product claim"
        );
        let verdict = self.provider.audit(images, claim).await;
        info!(
            request_id = claim.id,
            status = verdict.status.as_str(),
            "audit concluded"
        );

        Ok(verdict)
    }

    /// Runs the full flow for one submission document: extract the claim,
    /// audit it and, when approved, assemble the approval payload.
    ///
    /// Approval assembly is the one step that fails loud: a wrong guess
    /// there would feed bad data into the catalog, so there is no rejected
    /// fallback for it.
    pub async fn audit_submission(
        &self,
        submission: &Value,
        images: &ImageSet,
    ) -> AuditResult<AuditOutcome> {
        let claim = Claim::from_submission(submission)?;
        let verdict = self.audit(images, &claim).await?;

        let (message, approval_payload) = if verdict.is_approved() {
            info!(request_id = claim.id, "product approved, assembling approval payload");
            let payload = self
                .provider
                .assemble_approval(submission)
                .await
                .map_err(|source| AuditError::ApprovalAssembly { source })?;
            (
                "Product approved. Approval payload assembled.".to_string(),
                Some(payload),
            )
        } else {
            (format!("Product rejected: {}", verdict.reason), None)
        };

        Ok(AuditOutcome {
            request_id: claim.id,
            verdict,
            audited_at: Utc::now(),
            message,
            approval_payload,
        })
    }
}

//! Scripted provider for engine and gateway tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use super::VisionProvider;
use super::error::{ProviderError, ProviderResult};
use crate::audit::{Claim, ImageSet, Verdict};

/// Scripted [`VisionProvider`]: answers every audit with a fixed verdict,
/// every approval with a fixed payload, and records what it was asked.
pub struct MockVisionProvider {
    verdict: Verdict,
    /// `None` makes `assemble_approval` fail.
    approval: Option<Value>,
    audits: AtomicUsize,
    approvals: AtomicUsize,
    last_claim: Mutex<Option<Claim>>,
    last_image_count: AtomicUsize,
}

impl MockVisionProvider {
    pub(crate) const NAME: &'static str = "Mock";

    pub fn approving(reason: impl Into<String>) -> Self {
        Self::with_verdict(Verdict::approved(reason))
    }

    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self::with_verdict(Verdict::rejected(reason))
    }

    pub fn with_verdict(verdict: Verdict) -> Self {
        Self {
            verdict,
            approval: Some(json!({})),
            audits: AtomicUsize::new(0),
            approvals: AtomicUsize::new(0),
            last_claim: Mutex::new(None),
            last_image_count: AtomicUsize::new(0),
        }
    }

    pub fn with_approval_payload(mut self, payload: Value) -> Self {
        self.approval = Some(payload);
        self
    }

    pub fn failing_approval(mut self) -> Self {
        self.approval = None;
        self
    }

    pub fn audit_calls(&self) -> usize {
        self.audits.load(Ordering::SeqCst)
    }

    pub fn approval_calls(&self) -> usize {
        self.approvals.load(Ordering::SeqCst)
    }

    pub fn last_claim(&self) -> Option<Claim> {
        self.last_claim.lock().ok()?.clone()
    }

    pub fn last_image_count(&self) -> usize {
        self.last_image_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn audit(&self, images: &ImageSet, claim: &Claim) -> Verdict {
        self.audits.fetch_add(1, Ordering::SeqCst);
        self.last_image_count.store(images.len(), Ordering::SeqCst);
        if let Ok(mut last) = self.last_claim.lock() {
            *last = Some(claim.clone());
        }
        self.verdict.clone()
    }

    async fn assemble_approval(&self, _submission: &Value) -> ProviderResult<Value> {
        self.approvals.fetch_add(1, Ordering::SeqCst);
        self.approval
            .clone()
            .ok_or(ProviderError::EmptyReply {
                provider: Self::NAME,
            })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

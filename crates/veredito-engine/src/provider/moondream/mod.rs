//! Offline audit against a locally hosted vision model served by Ollama.

pub mod wire;


use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use super::VisionProvider;
use super::error::{ProviderError, ProviderResult};
use crate::audit::{Claim, ImageSet, Verdict};
use crate::config::MoondreamConfig;
use crate::matching::{self, MatchPolicy};
use crate::{interpret, prompt};
use wire::{GenerateOptions, GenerateRequest, GenerateResponse};

/// Local fallback provider. The model cannot reliably answer with a
/// structured verdict, so every image is transcribed separately and the
/// combined text is scored against the claim by the heuristic matcher.
pub struct MoondreamProvider {
    config: MoondreamConfig,
    policy: MatchPolicy,
    http: HttpClient,
}

impl MoondreamProvider {
    pub(crate) const NAME: &'static str = "Moondream (Offline)";

    pub fn new(config: MoondreamConfig, policy: MatchPolicy) -> ProviderResult<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::ClientBuild)?;

        Ok(Self {
            config,
            policy,
            http,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }

    /// One non-streaming round trip to `/api/generate`.
    async fn generate(
        &self,
        prompt: String,
        images: Vec<String>,
        options: GenerateOptions,
    ) -> ProviderResult<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            images,
            stream: false,
            options,
        };

        let response = self
            .http
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: Self::NAME,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            // Ollama answers 404 when the model tag was never pulled; that
            // one failure has a fix the operator can apply directly.
            if status == StatusCode::NOT_FOUND {
                return Err(ProviderError::ModelNotInstalled {
                    model: self.config.model.clone(),
                });
            }
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "no details".to_string());
            return Err(ProviderError::UpstreamStatus {
                provider: Self::NAME,
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateResponse =
            response
                .json()
                .await
                .map_err(|source| ProviderError::Transport {
                    provider: Self::NAME,
                    source,
                })?;

        Ok(reply.response)
    }

    /// Asks the model to transcribe one photograph.
    async fn describe_image(&self, image: &[u8]) -> ProviderResult<String> {
        self.generate(
            prompt::EXTRACTION_QUESTION.to_string(),
            vec![BASE64.encode(image)],
            GenerateOptions::extraction(),
        )
        .await
    }

    async fn try_audit(&self, images: &ImageSet, claim: &Claim) -> ProviderResult<Verdict> {
        let total = images.len();
        let mut extracted = Vec::with_capacity(total);

        for (index, image) in images.iter().enumerate() {
            debug!(
                request_id = claim.id,
                image = index + 1,
                total,
                "transcribing image"
            );
            let text = self.describe_image(image).await?;

            // Some model builds answer the extraction question with a
            // structured verdict anyway; take it at its word instead of
            // scoring it as label text.
            if interpret::looks_like_verdict(&text) {
                return Ok(interpret::direct_reply_verdict(&text));
            }

            extracted.push(text);
        }

        Ok(matching::score_extraction(&extracted, claim, &self.policy))
    }
}

#[async_trait]
impl VisionProvider for MoondreamProvider {
    async fn audit(&self, images: &ImageSet, claim: &Claim) -> Verdict {
        match self.try_audit(images, claim).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(request_id = claim.id, error = %e, "audit attempt failed, rejecting");
                Verdict::processing_failure(e)
            }
        }
    }

    async fn assemble_approval(&self, submission: &Value) -> ProviderResult<Value> {
        let instructions = prompt::approval_instructions(&submission.to_string());
        let text = self
            .generate(instructions, Vec::new(), GenerateOptions::approval())
            .await?;

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyReply {
                provider: Self::NAME,
            });
        }

        let json = interpret::extract_json(&text);
        serde_json::from_str(&json).map_err(|source| ProviderError::MalformedApproval { source })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

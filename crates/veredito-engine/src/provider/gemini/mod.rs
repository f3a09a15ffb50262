//! Remote audit over the Gemini multimodal API.

pub mod wire;


use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{debug, warn};

use super::VisionProvider;
use super::error::{ProviderError, ProviderResult};
use crate::audit::{Claim, ImageSet, Verdict};
use crate::config::GeminiConfig;
use crate::constants::INLINE_IMAGE_MIME_TYPE;
use crate::{interpret, prompt};
use wire::{Content, GenerateRequest, GenerateResponse, GenerationConfig, Part};

/// Remote multimodal provider: sends all images in one request and expects
/// a structured verdict back.
pub struct GeminiProvider {
    config: GeminiConfig,
    http: HttpClient,
}

impl GeminiProvider {
    pub(crate) const NAME: &'static str = "Gemini";

    pub fn new(config: GeminiConfig) -> ProviderResult<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::ClientBuild)?;

        Ok(Self { config, http })
    }

    /// Builds the multimodal audit request: every image as an inline base64
    /// part, then one text part with the audit instructions.
    fn audit_request(&self, images: &ImageSet, claim: &Claim) -> GenerateRequest {
        let mut parts: Vec<Part> = images
            .iter()
            .map(|image| Part::inline_image(INLINE_IMAGE_MIME_TYPE, BASE64.encode(image)))
            .collect();
        parts.push(Part::text(prompt::audit_instructions(claim, images.len())));

        GenerateRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig::audit(),
        }
    }

    /// Builds the text-only approval transform request.
    fn approval_request(&self, submission: &Value) -> GenerateRequest {
        let instructions = prompt::approval_instructions(&submission.to_string());

        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::text(instructions)],
            }],
            generation_config: GenerationConfig::approval(),
        }
    }

    /// POSTs one request to the model endpoint, API key as a query
    /// parameter.
    async fn call(&self, request: &GenerateRequest) -> ProviderResult<GenerateResponse> {
        debug!(url = %self.config.api_url, "calling Gemini API");

        let response = self
            .http
            .post(&self.config.api_url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: Self::NAME,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
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

        response
            .json()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: Self::NAME,
                source,
            })
    }

    async fn try_audit(&self, images: &ImageSet, claim: &Claim) -> ProviderResult<Verdict> {
        let request = self.audit_request(images, claim);
        let reply = self.call(&request).await?;

        Ok(match reply.first_text() {
            Some(text) => {
                debug!(request_id = claim.id, "interpreting model reply");
                interpret::strict_reply_verdict(text)
            }
            // A reply with no text is not an error to propagate: the audit
            // boundary absorbs it as a rejection.
            None => Verdict::rejected(interpret::UNPROCESSABLE_REPLY),
        })
    }
}

#[async_trait]
impl VisionProvider for GeminiProvider {
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
        let request = self.approval_request(submission);
        let reply = self.call(&request).await?;

        let text = reply.first_text().ok_or(ProviderError::EmptyReply {
            provider: Self::NAME,
        })?;

        let json = interpret::extract_json(text);
        serde_json::from_str(&json).map_err(|source| ProviderError::MalformedApproval { source })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

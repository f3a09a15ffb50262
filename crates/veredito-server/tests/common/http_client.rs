//! HTTP client helpers for tests.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Posts one audit submission. Each image is a `(bytes, content_type)`
    /// pair. Returns the decoded body plus the status header value.
    pub async fn audit(
        &self,
        data: &Value,
        images: Vec<(Vec<u8>, &str)>,
    ) -> Result<(AuditResponse, String), TestClientError> {
        let mut form = reqwest::multipart::Form::new().text("data", data.to_string());
        for (bytes, content_type) in images {
            let part = reqwest::multipart::Part::bytes(bytes)
                .file_name("photo.jpg")
                .mime_str(content_type)?;
            form = form.part("images", part);
        }

        let resp = self
            .client
            .post(self.url("/v1/audits"))
            .multipart(form)
            .send()
            .await?;

        let status_header = resp
            .headers()
            .get("x-veredito-status")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        match resp.status().as_u16() {
            200 => Ok((resp.json().await?, status_header)),
            400 | 422 => Err(TestClientError::BadRequest(resp.text().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditResponse {
    pub request_id: i64,
    pub verdict: VerdictBody,
    pub audited_at: String,
    pub message: String,
    #[serde(default)]
    pub approval_payload: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerdictBody {
    pub status: String,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_url_building() {
        let client = TestClient::new("http://localhost:8080");
        assert_eq!(client.url("/healthz"), "http://localhost:8080/healthz");
        assert_eq!(client.url("healthz"), "http://localhost:8080/healthz");
    }

    #[test]
    fn test_audit_response_parses_without_payload() {
        let body = serde_json::json!({
            "request_id": 17,
            "verdict": { "status": "REJECTED", "reason": "mismatch" },
            "audited_at": "2025-06-02T14:00:00+00:00",
            "message": "Product rejected: mismatch"
        });
        let parsed: AuditResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.verdict.status, "REJECTED");
        assert!(parsed.approval_payload.is_none());
    }
}

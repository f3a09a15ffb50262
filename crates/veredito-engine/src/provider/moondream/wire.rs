//! Wire types for the Ollama `/api/generate` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Base64-encoded image bytes; empty for text-only calls.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    pub stream: bool,
    pub options: GenerateOptions,
}

#[derive(Debug, Serialize)]
pub struct GenerateOptions {
    pub temperature: f64,
    pub num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl GenerateOptions {
    /// Short label-extraction reply, stopped at the first closing brace so
    /// the model cannot ramble past a JSON verdict.
    pub fn extraction() -> Self {
        Self {
            temperature: 0.1,
            num_predict: 200,
            stop: Some(vec!["}".to_string()]),
        }
    }

    /// Token room for a whole approval document, no stop sequence.
    pub fn approval() -> Self {
        Self {
            temperature: 0.1,
            num_predict: 4096,
            stop: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

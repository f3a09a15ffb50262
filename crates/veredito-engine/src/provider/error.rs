use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned {status}: {body}")]
    UpstreamStatus {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("model '{model}' not installed; run: ollama pull {model}")]
    ModelNotInstalled { model: String },

    #[error("reply from {provider} held no generated text")]
    EmptyReply { provider: &'static str },

    #[error("assembled approval payload is not valid JSON: {source}")]
    MalformedApproval {
        #[source]
        source: serde_json::Error,
    },
}

pub type ProviderResult<T> = Result<T, ProviderError>;

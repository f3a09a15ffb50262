//! Environment-backed configuration.
//!
//! The provider selector is required; most other settings have defaults.
//! Override with `VEREDITO_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::matching::MatchPolicy;

/// Vision backend selected for the whole process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Remote Gemini multimodal API.
    Gemini,
    /// Local Moondream model served by Ollama.
    Moondream,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Moondream => "moondream",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "moondream" => Ok(ProviderKind::Moondream),
            _ => Err(ConfigError::UnknownProvider {
                value: s.to_string(),
            }),
        }
    }
}

/// Settings for the remote Gemini backend.
///
/// Both `api_url` and `api_key` must be set when the provider is `gemini`;
/// [`Config::validate`] enforces this.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Model endpoint URL (the API key is appended as a query parameter).
    pub api_url: String,

    /// API key passed as the `key` query parameter.
    pub api_key: String,

    /// Per-call timeout. Default: 60s.
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_GEMINI_TIMEOUT_SECS),
        }
    }
}

/// Settings for the local Moondream backend served by Ollama.
#[derive(Debug, Clone)]
pub struct MoondreamConfig {
    /// Ollama base URL. Default: `http://localhost:11434`.
    pub base_url: String,

    /// Model name to request. Default: `moondream`.
    pub model: String,

    /// Per-call timeout. Default: 120s. The local model is slower than the
    /// remote API, especially on CPU-only hosts.
    pub timeout: Duration,
}

impl Default for MoondreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MOONDREAM_URL.to_string(),
            model: DEFAULT_MOONDREAM_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_MOONDREAM_TIMEOUT_SECS),
        }
    }
}

/// Audit service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `VEREDITO_*` overrides on top of
/// defaults. The provider selector has no default: a process that does not
/// name its backend must fail at startup, not at the first audit.
#[derive(Debug, Clone)]
pub struct Config {
    /// Active vision backend. Required (`VEREDITO_PROVIDER`).
    pub provider: ProviderKind,

    /// Remote provider settings (used when `provider` is `gemini`).
    pub gemini: GeminiConfig,

    /// Local provider settings (used when `provider` is `moondream`).
    pub moondream: MoondreamConfig,

    /// Thresholds for the offline fuzzy matcher.
    pub match_policy: MatchPolicy,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// HTTP server port. Default: `8080`.
    pub port: u16,
}

/// Default Ollama URL used when `VEREDITO_MOONDREAM_URL` is not set.
pub const DEFAULT_MOONDREAM_URL: &str = "http://localhost:11434";

/// Default model name used when `VEREDITO_MOONDREAM_MODEL` is not set.
pub const DEFAULT_MOONDREAM_MODEL: &str = "moondream";

/// Default per-call timeout for the remote provider, in seconds.
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 60;

/// Default per-call timeout for the local provider, in seconds.
pub const DEFAULT_MOONDREAM_TIMEOUT_SECS: u64 = 120;

impl Config {
    const ENV_PROVIDER: &'static str = "VEREDITO_PROVIDER";
    const ENV_GEMINI_API_URL: &'static str = "VEREDITO_GEMINI_API_URL";
    const ENV_GEMINI_API_KEY: &'static str = "VEREDITO_GEMINI_API_KEY";
    const ENV_GEMINI_TIMEOUT_SECS: &'static str = "VEREDITO_GEMINI_TIMEOUT_SECS";
    const ENV_MOONDREAM_URL: &'static str = "VEREDITO_MOONDREAM_URL";
    const ENV_MOONDREAM_MODEL: &'static str = "VEREDITO_MOONDREAM_MODEL";
    const ENV_MOONDREAM_TIMEOUT_SECS: &'static str = "VEREDITO_MOONDREAM_TIMEOUT_SECS";
    const ENV_BARCODE_PREFIX_RATIO: &'static str = "VEREDITO_BARCODE_PREFIX_RATIO";
    const ENV_DESCRIPTION_FULL_RATIO: &'static str = "VEREDITO_DESCRIPTION_FULL_RATIO";
    const ENV_DESCRIPTION_PARTIAL_RATIO: &'static str = "VEREDITO_DESCRIPTION_PARTIAL_RATIO";
    const ENV_BIND_ADDR: &'static str = "VEREDITO_BIND_ADDR";
    const ENV_PORT: &'static str = "VEREDITO_PORT";

    /// Loads configuration from environment variables (falling back to
    /// defaults where one exists).
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini_defaults = GeminiConfig::default();
        let moondream_defaults = MoondreamConfig::default();
        let policy_defaults = MatchPolicy::default();

        let provider = Self::parse_provider_from_env()?;

        let gemini = GeminiConfig {
            api_url: Self::parse_string_from_env(Self::ENV_GEMINI_API_URL, gemini_defaults.api_url),
            api_key: Self::parse_string_from_env(Self::ENV_GEMINI_API_KEY, gemini_defaults.api_key),
            timeout: Self::parse_timeout_from_env(
                Self::ENV_GEMINI_TIMEOUT_SECS,
                gemini_defaults.timeout,
            ),
        };

        let moondream = MoondreamConfig {
            base_url: Self::parse_string_from_env(
                Self::ENV_MOONDREAM_URL,
                moondream_defaults.base_url,
            ),
            model: Self::parse_string_from_env(
                Self::ENV_MOONDREAM_MODEL,
                moondream_defaults.model,
            ),
            timeout: Self::parse_timeout_from_env(
                Self::ENV_MOONDREAM_TIMEOUT_SECS,
                moondream_defaults.timeout,
            ),
        };

        let match_policy = MatchPolicy {
            barcode_prefix_ratio: Self::parse_ratio_from_env(
                Self::ENV_BARCODE_PREFIX_RATIO,
                policy_defaults.barcode_prefix_ratio,
            )?,
            description_full_ratio: Self::parse_ratio_from_env(
                Self::ENV_DESCRIPTION_FULL_RATIO,
                policy_defaults.description_full_ratio,
            )?,
            description_partial_ratio: Self::parse_ratio_from_env(
                Self::ENV_DESCRIPTION_PARTIAL_RATIO,
                policy_defaults.description_partial_ratio,
            )?,
        };

        let bind_addr = Self::parse_bind_addr_from_env(default_bind_addr())?;
        let port = Self::parse_port_from_env(8080)?;

        Ok(Self {
            provider,
            gemini,
            moondream,
            match_policy,
            bind_addr,
            port,
        })
    }

    /// Validates cross-field invariants: provider-specific required values
    /// and match-policy thresholds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.provider {
            ProviderKind::Gemini => {
                if self.gemini.api_url.trim().is_empty() {
                    return Err(ConfigError::MissingEnvVar {
                        name: Self::ENV_GEMINI_API_URL,
                    });
                }
                if self.gemini.api_key.trim().is_empty() {
                    return Err(ConfigError::MissingEnvVar {
                        name: Self::ENV_GEMINI_API_KEY,
                    });
                }
            }
            ProviderKind::Moondream => {
                if self.moondream.base_url.trim().is_empty() {
                    return Err(ConfigError::MissingEnvVar {
                        name: Self::ENV_MOONDREAM_URL,
                    });
                }
                if self.moondream.model.trim().is_empty() {
                    return Err(ConfigError::MissingEnvVar {
                        name: Self::ENV_MOONDREAM_MODEL,
                    });
                }
            }
        }

        Self::check_ratio_range(
            Self::ENV_BARCODE_PREFIX_RATIO,
            self.match_policy.barcode_prefix_ratio,
        )?;
        Self::check_ratio_range(
            Self::ENV_DESCRIPTION_FULL_RATIO,
            self.match_policy.description_full_ratio,
        )?;
        Self::check_ratio_range(
            Self::ENV_DESCRIPTION_PARTIAL_RATIO,
            self.match_policy.description_partial_ratio,
        )?;

        if self.match_policy.description_partial_ratio > self.match_policy.description_full_ratio {
            return Err(ConfigError::InvertedRatios {
                partial: self.match_policy.description_partial_ratio,
                full: self.match_policy.description_full_ratio,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_provider_from_env() -> Result<ProviderKind, ConfigError> {
        match env::var(Self::ENV_PROVIDER) {
            Ok(value) => value.parse(),
            Err(_) => Err(ConfigError::MissingEnvVar {
                name: Self::ENV_PROVIDER,
            }),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_ratio_from_env(var_name: &'static str, default: f64) -> Result<f64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::RatioParseError {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn check_ratio_range(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if value <= 0.0 || value > 1.0 {
            return Err(ConfigError::RatioOutOfRange { name, value });
        }
        Ok(())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_timeout_from_env(var_name: &str, default: Duration) -> Duration {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(default)
    }
}

fn default_bind_addr() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
}

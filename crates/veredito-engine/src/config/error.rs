//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// Provider selector did not name a known backend.
    #[error("unknown provider '{value}': expected 'gemini' or 'moondream'")]
    UnknownProvider { value: String },

    /// Match-policy ratio string could not be parsed as a number.
    #[error("failed to parse {name} '{value}': {source}")]
    RatioParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Match-policy ratio is outside the accepted range.
    #[error("invalid {name} '{value}': must be greater than 0 and at most 1")]
    RatioOutOfRange { name: &'static str, value: f64 },

    /// The partial-match threshold exceeds the full-match threshold.
    #[error(
        "description partial-match ratio {partial} exceeds full-match ratio {full}"
    )]
    InvertedRatios { partial: f64, full: f64 },
}

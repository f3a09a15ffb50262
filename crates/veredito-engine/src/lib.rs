//! Veredito library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Process configuration
//! - [`Claim`], [`ImageSet`], [`Verdict`], [`AuditOutcome`] - Audit data model
//! - [`AuditEngine`] - Orchestration of one audit call
//!
//! ## Providers
//! - [`VisionProvider`] - The audit capability contract
//! - [`GeminiProvider`], [`MoondreamProvider`] - The two backends
//! - [`build_provider`] - Configuration-driven backend selection
//!
//! ## Interpretation & Matching
//! - [`interpret`] - Model-reply to verdict conversion
//! - [`matching`] - Heuristic text scoring for the offline path
//!
//! ## Test/Mock Support
//! A scripted provider is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod audit;
pub mod config;
pub mod constants;
pub mod interpret;
pub mod matching;
pub mod prompt;
pub mod provider;

pub use audit::{
    AuditEngine, AuditError, AuditOutcome, AuditResult, AuditStatus, Barcode, Claim, ImageSet,
    UNSPECIFIED_REASON, Verdict,
};
pub use config::{Config, ConfigError, GeminiConfig, MoondreamConfig, ProviderKind};
pub use constants::{
    ALLOWED_IMAGE_CONTENT_TYPES, MAX_IMAGE_BYTES, VEREDITO_STATUS_ERROR, VEREDITO_STATUS_HEADER,
    VEREDITO_STATUS_HEALTHY, is_allowed_image_type,
};
pub use matching::{MatchGrade, MatchPolicy, MatchScore};
#[cfg(any(test, feature = "mock"))]
pub use provider::MockVisionProvider;
pub use provider::{
    GeminiProvider, MoondreamProvider, ProviderError, ProviderResult, VisionProvider,
    build_provider,
};

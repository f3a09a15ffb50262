//! The audit core: claim and verdict types, input validation and the
//! orchestration engine.

mod engine;
mod error;
mod types;


pub use engine::AuditEngine;
pub use error::{AuditError, AuditResult};
pub use types::{AuditOutcome, AuditStatus, Barcode, Claim, ImageSet, UNSPECIFIED_REASON, Verdict};

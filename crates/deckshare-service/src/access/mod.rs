//! Viewer verification: code requests, code checks, requirements and
//! content access.

pub mod service;
pub mod types;

pub use service::{VerificationDeps, VerificationService};
pub use types::{CodeRequestReceipt, LinkRequirements, VerifiedSession, ViewGrant};

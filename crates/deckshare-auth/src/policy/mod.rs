//! Share-link access policy.

pub mod evaluator;
pub mod verdict;

pub use evaluator::AccessPolicyEvaluator;
pub use verdict::{DenyReason, Verdict};

//! Policy verdicts.

use serde::{Deserialize, Serialize};

/// Why a candidate was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The link's absolute expiry has passed.
    Expired,
    /// The link is older than the maximum age.
    TooOld,
    /// No email, or a malformed one, was supplied.
    InvalidEmail,
    /// The email is not the recipient and matches no allow-list entry.
    NotAuthorized,
}

impl DenyReason {
    /// Message suitable for API responses.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Expired => "This share link has expired",
            Self::TooOld => "This share link is no longer valid",
            Self::InvalidEmail => "A valid email address is required",
            Self::NotAuthorized => "This email is not authorized to view this deck",
        }
    }
}

/// Outcome of evaluating a candidate against a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Anyone may view.
    Granted,
    /// The candidate is eligible but must prove the email with a code.
    RequiresOtp,
    /// The candidate may not view.
    Denied(DenyReason),
}

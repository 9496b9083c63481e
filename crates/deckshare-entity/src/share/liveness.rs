//! Share link liveness: absolute expiry combined with maximum age.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Validity state of a share link at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Liveness {
    /// The link may be used.
    Alive,
    /// `expires_at` has passed.
    Expired,
    /// The link is older than the maximum age, whatever its `expires_at`.
    TooOld,
}

impl Liveness {
    /// Evaluate liveness for a link created at `created_at` with an optional
    /// absolute expiry. Whichever limit comes first terminates validity.
    pub fn evaluate(
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        if let Some(expires_at) = expires_at {
            if expires_at <= now {
                return Self::Expired;
            }
        }
        if created_at + max_age <= now {
            return Self::TooOld;
        }
        Self::Alive
    }
}

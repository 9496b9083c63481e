//! Access policy evaluation for share links.
//!
//! Order of checks:
//! 1. link liveness (absolute expiry, then maximum age)
//! 2. public links are granted outright
//! 3. the candidate email must be well-formed
//! 4. a non-empty allow-list decides on its own
//! 5. otherwise the email must be the recipient
//!
//! Passing 3-5 yields [`Verdict::RequiresOtp`]; this module never grants
//! identity-gated access by itself.

use chrono::{DateTime, Utc};

use deckshare_core::types::{email_domain, is_valid_email, normalize_email};
use deckshare_entity::share::{AccessLevel, Liveness, ShareLink};

use super::verdict::{DenyReason, Verdict};

/// Pure evaluator; holds only the maximum link age.
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicyEvaluator {
    max_link_age_days: i64,
}

impl AccessPolicyEvaluator {
    /// Create an evaluator enforcing `max_link_age_days`.
    pub fn new(max_link_age_days: i64) -> Self {
        Self { max_link_age_days }
    }

    /// Liveness of `link` at `now`.
    pub fn liveness_at(&self, link: &ShareLink, now: DateTime<Utc>) -> Liveness {
        link.liveness_at(now, self.max_link_age_days)
    }

    /// Evaluate `candidate` against `link` at the current time.
    pub fn evaluate(&self, link: &ShareLink, candidate: Option<&str>) -> Verdict {
        self.evaluate_at(link, candidate, Utc::now())
    }

    /// Evaluate `candidate` against `link` as if the current time were `now`.
    pub fn evaluate_at(
        &self,
        link: &ShareLink,
        candidate: Option<&str>,
        now: DateTime<Utc>,
    ) -> Verdict {
        match self.liveness_at(link, now) {
            Liveness::Expired => return Verdict::Denied(DenyReason::Expired),
            Liveness::TooOld => return Verdict::Denied(DenyReason::TooOld),
            Liveness::Alive => {}
        }

        if link.access_level == AccessLevel::Public {
            return Verdict::Granted;
        }

        let email = match candidate.map(normalize_email) {
            Some(email) if is_valid_email(&email) => email,
            _ => return Verdict::Denied(DenyReason::InvalidEmail),
        };

        let authorized = if link.has_allow_list() {
            matches_allow_list(link, &email)
        } else {
            link.recipient_email
                .as_deref()
                .is_some_and(|r| normalize_email(r) == email)
        };

        if authorized {
            Verdict::RequiresOtp
        } else {
            Verdict::Denied(DenyReason::NotAuthorized)
        }
    }
}

fn matches_allow_list(link: &ShareLink, email: &str) -> bool {
    if link.allowed_emails.iter().any(|a| normalize_email(a) == email) {
        return true;
    }
    let Some(domain) = email_domain(email) else {
        return false;
    };
    link.allowed_domains.iter().any(|allowed| {
        let allowed = normalize_email(allowed);
        let allowed = allowed.trim_start_matches('@');
        !allowed.is_empty()
            && (domain == allowed
                || domain
                    .strip_suffix(allowed)
                    .is_some_and(|prefix| prefix.ends_with('.')))
    })
}

//! Request context carrying the authenticated deck owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for an owner-authenticated request.
///
/// Extracted from the owner token and passed into service methods so that
/// every owner operation is scoped to *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerContext {
    /// The authenticated owner's user ID.
    pub user_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl OwnerContext {
    /// Creates a new owner context.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            request_time: Utc::now(),
        }
    }
}

//! Deck entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An uploaded PDF deck. Only the columns the sharing core reads are mapped.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deck {
    /// Unique deck identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Display title.
    pub title: String,
    /// Object path of the PDF inside the blob store.
    pub file_path: String,
    /// When the deck was uploaded.
    pub created_at: DateTime<Utc>,
}

impl Deck {
    /// Whether `user_id` owns this deck.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

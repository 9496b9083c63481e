//! # deckshare-database
//!
//! PostgreSQL connection management and repository implementations for
//! decks and share links. Services depend on the [`repositories::ShareLinkStore`]
//! and [`repositories::DeckStore`] traits so they can be tested without a
//! database.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;

//! # deckshare-entity
//!
//! Domain entity models for DeckShare. Every struct in this crate
//! represents a database table row or a domain value object. Row structs
//! derive `sqlx::FromRow`; values that must satisfy invariants are built
//! through validating constructors.

pub mod deck;
pub mod share;

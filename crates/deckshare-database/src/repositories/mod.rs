//! Repository implementations for DeckShare entities.

pub mod deck;
pub mod share;

pub use deck::{DeckRepository, DeckStore};
pub use share::{ShareLinkRepository, ShareLinkStore};

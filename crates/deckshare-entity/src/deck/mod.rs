//! Deck domain entities.

pub mod model;

pub use model::Deck;

//! # deckshare-storage
//!
//! Blob store implementations for DeckShare. Deck files are never proxied
//! through the service; viewers receive time-limited signed URLs minted by
//! the object store.

pub mod providers;

pub use providers::HttpBlobStore;

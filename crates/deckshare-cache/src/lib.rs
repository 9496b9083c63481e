//! # deckshare-cache
//!
//! Cache provider implementations for DeckShare:
//!
//! - **redis**: Redis-backed cache and Lua OTP transactions (production)
//! - **memory**: in-process store behind one mutex, compiled only with the
//!   `memory` feature for tests and local development
//!
//! The provider is selected at runtime based on configuration and is
//! refused if its backend was not compiled in.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;

//! # deckshare-core
//!
//! Core crate for DeckShare. Contains the configuration schema, the
//! collaborator traits (cache, atomic OTP scripts, blob store, notification
//! sink), email helpers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DeckShare crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

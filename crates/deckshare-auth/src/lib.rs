//! # deckshare-auth
//!
//! Identity checks for shared decks.
//!
//! ## Modules
//!
//! - `jwt`: viewer session tokens (issue/verify) and owner token decoding
//! - `otp`: rate-limited one-time passcodes backed by atomic cache transactions
//! - `policy`: share-link access policy evaluation

pub mod jwt;
pub mod otp;
pub mod policy;

pub use jwt::{OwnerClaims, OwnerTokenDecoder, SessionClaims, SessionTokenIssuer, SessionTokenVerifier};
pub use otp::{CodeGeneration, CodeVerification, RateLimitedCodeStore};
pub use policy::{AccessPolicyEvaluator, DenyReason, Verdict};

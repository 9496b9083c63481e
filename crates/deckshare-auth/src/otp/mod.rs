//! One-time passcodes bound to an (email, share token) pair.

pub mod code;
pub mod store;

pub use code::{CODE_LEN, generate_code, is_well_formed};
pub use store::{CodeGeneration, CodeVerification, LinkCodeCheck, RateLimitedCodeStore};

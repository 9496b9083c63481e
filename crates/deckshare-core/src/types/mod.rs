//! Value helpers shared across the DeckShare workspace.

pub mod email;

pub use email::{email_domain, is_valid_email, mask_email, normalize_email};

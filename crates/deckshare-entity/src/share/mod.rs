//! Share link domain entities.

pub mod access_level;
pub mod identifier;
pub mod liveness;
pub mod model;

pub use access_level::AccessLevel;
pub use identifier::{MAX_IDENTIFIER_LEN, sanitize_identifier};
pub use liveness::Liveness;
pub use model::{CreateLimits, CreateShareLink, ShareLink, ShareLinkOptions};

//! JWT encoding, decoding, and claims.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{OwnerClaims, SessionClaims};
pub use decoder::{OwnerTokenDecoder, SessionTokenVerifier};
pub use encoder::{IssuedSession, SessionTokenIssuer};

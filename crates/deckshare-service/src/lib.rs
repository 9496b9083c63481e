//! # deckshare-service
//!
//! Business logic service layer for DeckShare. Each service orchestrates
//! repositories, the cache-backed code store, token handling, and the
//! blob and mail collaborators to implement application use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod access;
pub mod context;
pub mod notification;
pub mod share;

pub use access::VerificationService;
pub use context::OwnerContext;
pub use notification::SmtpNotificationSink;
pub use share::{ShareLinkService, generate_link_token};

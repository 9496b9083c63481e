//! Collaborator traits defined in `deckshare-core` and implemented by other crates.

pub mod blob;
pub mod cache;
pub mod notifier;
pub mod otp;

pub use blob::BlobStore;
pub use cache::CacheProvider;
pub use notifier::NotificationSink;
pub use otp::{
    GenerateParams, GenerateScriptOutcome, OtpKeys, OtpScripts, VerifyParams,
    VerifyScriptOutcome,
};

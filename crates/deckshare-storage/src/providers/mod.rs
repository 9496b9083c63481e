//! Blob store providers.

pub mod http;

pub use http::HttpBlobStore;

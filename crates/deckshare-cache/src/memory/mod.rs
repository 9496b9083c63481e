//! In-process cache backend for tests and local development.

pub mod store;

pub use store::MemoryCacheProvider;

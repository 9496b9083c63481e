//! Redis cache provider and Lua OTP transactions.

pub mod client;
pub mod operations;
pub mod scripts;

pub use client::RedisClient;
pub use operations::RedisCacheProvider;

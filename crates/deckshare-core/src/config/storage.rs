//! Blob store configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Settings for the HTTP object store that holds deck PDFs.
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base URL of the storage API (e.g. `https://project.example.co/storage/v1`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bucket holding deck files.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Service key sent as a bearer credential.
    #[serde(default)]
    pub service_key: String,
    /// Timeout for one signing request, in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bucket: default_bucket(),
            service_key: String::new(),
            timeout_ms: default_timeout(),
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("base_url", &self.base_url)
            .field("bucket", &self.bucket)
            .field("service_key", &"****")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/storage/v1".to_string()
}

fn default_bucket() -> String {
    "decks".to_string()
}

fn default_timeout() -> u64 {
    3000
}

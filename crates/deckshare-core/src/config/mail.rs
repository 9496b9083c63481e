//! Outbound mail configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// SMTP settings for delivering passcodes.
#[derive(Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP relay host.
    #[serde(default = "default_host")]
    pub smtp_host: String,
    /// SMTP submission port.
    #[serde(default = "default_port")]
    pub smtp_port: u16,
    /// Use TLS: implicit on port 465, STARTTLS otherwise. Disable only for
    /// local relays such as a development mail catcher.
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    /// SMTP username (empty = no authentication).
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address for outgoing mail.
    #[serde(default = "default_from")]
    pub from_address: String,
    /// Product name used in subjects and bodies.
    #[serde(default = "default_product_name")]
    pub product_name: String,
    /// Timeout for a single delivery, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_host(),
            smtp_port: default_port(),
            use_tls: default_use_tls(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: default_from(),
            product_name: default_product_name(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("use_tls", &self.use_tls)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"****")
            .field("from_address", &self.from_address)
            .field("product_name", &self.product_name)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    587
}

fn default_use_tls() -> bool {
    true
}

fn default_from() -> String {
    "DeckShare <no-reply@deckshare.local>".to_string()
}

fn default_product_name() -> String {
    "DeckShare".to_string()
}

fn default_timeout() -> u64 {
    10
}

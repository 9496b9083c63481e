//! Share link access level enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a share link checks the identity of its viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Anyone holding the token may view.
    Public,
    /// Only the recipient (or allow-listed identities), after OTP verification.
    Restricted,
    /// Only allow-listed identities or the recipient, after OTP verification.
    Whitelisted,
}

impl AccessLevel {
    /// Whether viewers must prove an email identity.
    pub fn requires_identity(&self) -> bool {
        !matches!(self, Self::Public)
    }

    /// Return the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Restricted => "restricted",
            Self::Whitelisted => "whitelisted",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = deckshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "restricted" => Ok(Self::Restricted),
            "whitelisted" => Ok(Self::Whitelisted),
            _ => Err(deckshare_core::AppError::validation(format!(
                "Invalid access level: '{s}'. Expected one of: public, restricted, whitelisted"
            ))),
        }
    }
}

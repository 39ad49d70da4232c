use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized account identifier used as the role-lookup key.
///
/// Construction always lower-cases and trims, so every cache key,
/// repository key and ownership comparison operates on the same form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_ascii_lowercase())
    }

    /// The empty identity carried by guest callers.
    pub fn anonymous() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ownership-field comparison; the other side may be un-normalized.
    pub fn matches(&self, other: &str) -> bool {
        !self.0.is_empty() && self.0 == other.trim().to_ascii_lowercase()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

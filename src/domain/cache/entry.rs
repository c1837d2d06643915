//! Cache entry and tier types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached answer keyed by the exact query or prompt text
///
/// Keys are compared byte for byte; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    L1,
    L2,
    Pipeline,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::L1 => write!(f, "l1"),
            Tier::L2 => write!(f, "l2"),
            Tier::Pipeline => write!(f, "pipeline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_keeps_key_verbatim() {
        let entry = CacheEntry::new("  Gas Leak Risk ", "Risk: High");
        assert_eq!(entry.key, "  Gas Leak Risk ");
        assert_eq!(entry.value, "Risk: High");
    }

    #[test]
    fn test_tier_serialization() {
        assert_eq!(serde_json::to_string(&Tier::L1).unwrap(), "\"l1\"");
        assert_eq!(serde_json::to_string(&Tier::Pipeline).unwrap(), "\"pipeline\"");
        assert_eq!(Tier::L2.to_string(), "l2");
    }
}

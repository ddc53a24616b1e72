//! Producer identity types
//!
//! Principals arrive from the external identity provider with every
//! submission; the core trusts their authenticity but checks the
//! role-to-record-kind mapping itself (see `authz`). The core holds no
//! ambient session state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Producer role, exactly one per principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Collector,
    Processor,
    Lab,
    Manufacturer,
}

impl Role {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collector => "collector",
            Self::Processor => "processor",
            Self::Lab => "lab",
            Self::Manufacturer => "manufacturer",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "collector" => Some(Self::Collector),
            "processor" => Some(Self::Processor),
            "lab" => Some(Self::Lab),
            "manufacturer" => Some(Self::Manufacturer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A submitting principal, as supplied by the identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Identity-provider id (e.g. "COL-001")
    pub id: String,
    /// Display name
    pub name: String,
    /// Producer role
    pub role: Role,
    /// Organization (cooperative, lab, company)
    pub organization: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in [
            Role::Collector,
            Role::Processor,
            Role::Lab,
            Role::Manufacturer,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("consumer"), None);
    }
}

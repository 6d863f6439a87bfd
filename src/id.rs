//! Opaque entity identifiers.
//!
//! Every cross-entity link in a [`FuzzyLogic`](crate::model::FuzzyLogic) graph is an
//! [`Id`], never a pointer. Nodes may reference each other in either direction, so
//! ownership stays a tree (container → entities) and the graph lives in the ids.
//!
//! # Invariants
//!
//! - **FLS-ID-001** — Ids are minted once at creation (UUID v4) and never reused.
//! - **FLS-ID-002** — Ids carry no kind tag; what an id names is decided by lookup.

use alloc::string::{String, ToString};
use core::fmt;

/// A globally unique, opaque string token naming one entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Id(String);

impl Id {
    /// Mint a fresh identifier.
    pub fn mint() -> Self {
        Self(uuid::Uuid::new_v4().hyphenated().to_string())
    }

    /// Wrap an existing token, e.g. one read back from storage.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The underlying token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(token: &str) -> Self {
        Self::from_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_ids_are_distinct() {
        let a = Id::mint();
        let b = Id::mint();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36, "hyphenated uuid: {}", a);
    }

    #[test]
    fn test_from_token_round_trips() {
        let id = Id::from_token("trapezoid-a");
        assert_eq!(id.as_str(), "trapezoid-a");
        assert_eq!(id, Id::from("trapezoid-a"));
    }
}

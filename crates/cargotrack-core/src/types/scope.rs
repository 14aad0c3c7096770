//! Visibility scope applied to list queries.

use serde::{Deserialize, Serialize};

/// Which records a caller may see in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// Every record (administrators).
    All,
    /// Only records where this email is a party.
    Party(String),
}

impl Scope {
    /// Whether a record with the given party emails is visible.
    pub fn includes<'a>(&self, parties: impl IntoIterator<Item = &'a str>) -> bool {
        match self {
            Self::All => true,
            Self::Party(email) => parties.into_iter().any(|p| p == email),
        }
    }

    /// The restricting email, if any.
    pub fn party(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Party(email) => Some(email),
        }
    }
}

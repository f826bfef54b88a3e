//! Identifier types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for an authenticated actor.
///
/// Random UUID v4, stable for the lifetime of the account. Two
/// principals with the same login but different ids are different
/// accounts.
///
/// # Example
///
/// ```
/// use pagegate_types::PrincipalId;
///
/// let user = PrincipalId::new();
/// let admin = PrincipalId::new();
///
/// assert_ne!(user, admin);
/// assert!(user.to_string().starts_with("principal:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// Creates a new [`PrincipalId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PrincipalId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "principal:{}", self.0)
    }
}

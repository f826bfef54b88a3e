//! Principal (authenticated actor) type.
//!
//! A [`Principal`] is identity plus group membership. Whether that
//! identity may see a page is decided elsewhere, by the access policy
//! in `pagegate-auth`.

use crate::PrincipalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An authenticated actor.
///
/// Created at login, mutated when its last-seen timestamp is touched,
/// and dropped with the session at logout.
///
/// # Last-seen
///
/// `last_seen` is advisory presence information. It only moves forward:
/// [`touch_last_seen`](Self::touch_last_seen) ignores timestamps older
/// than the one already recorded.
///
/// # Example
///
/// ```
/// use pagegate_types::Principal;
/// use chrono::Utc;
///
/// let mut bob = Principal::new("bob").with_groups(["editor", "staff"]);
/// assert!(bob.in_group("staff"));
/// assert!(!bob.in_group("admin"));
///
/// let now = Utc::now();
/// bob.touch_last_seen(now);
/// assert_eq!(bob.last_seen(), Some(now));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: PrincipalId,
    login: String,
    #[serde(default)]
    groups: BTreeSet<String>,
    #[serde(default)]
    last_seen: Option<DateTime<Utc>>,
}

impl Principal {
    /// Creates a principal with a fresh id and no groups.
    #[must_use]
    pub fn new(login: impl Into<String>) -> Self {
        Self::with_id(PrincipalId::new(), login)
    }

    /// Creates a principal with a known id.
    #[must_use]
    pub fn with_id(id: PrincipalId, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
            groups: BTreeSet::new(),
            last_seen: None,
        }
    }

    /// Adds group codes, returning the updated principal.
    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn id(&self) -> PrincipalId {
        self.id
    }

    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Group codes this principal belongs to.
    #[must_use]
    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    /// Returns `true` if the principal belongs to `code`.
    #[must_use]
    pub fn in_group(&self, code: &str) -> bool {
        self.groups.contains(code)
    }

    #[must_use]
    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }

    /// Records presence at `at`.
    ///
    /// Never moves the timestamp backwards.
    pub fn touch_last_seen(&mut self, at: DateTime<Utc>) {
        match self.last_seen {
            Some(prev) if prev >= at => {}
            _ => self.last_seen = Some(at),
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.login)
    }
}

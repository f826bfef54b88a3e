//! Session types (Principal + impersonation).

use chrono::{DateTime, Utc};
use pagegate_types::Principal;
use serde::{Deserialize, Serialize};

/// Back-reference from an impersonating session to the real actor.
///
/// Not ownership: the link exists only so the session can be reverted
/// when impersonation stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpersonationLink {
    /// The principal who started impersonating.
    pub impersonator: Principal,
    /// Token the impersonator's own session carried, restored on revert.
    pub impersonator_token: Option<String>,
    /// When impersonation started.
    pub started_at: DateTime<Utc>,
}

/// Whether a session is acting as someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Normal,
    Impersonating,
}

/// Ties a [`Principal`] to the request pipeline.
///
/// A missing session means the viewer is a guest; there is no
/// "anonymous" session value.
///
/// # Transitions
///
/// ```text
///            impersonate(target)
///   Normal ──────────────────────► Impersonating
///      ▲                                │
///      └────── stop_impersonating() ────┘
/// ```
///
/// [`impersonate`](Self::impersonate) and
/// [`stop_impersonating`](Self::stop_impersonating) return new sessions
/// and leave `self` untouched. Only the last-seen timestamp of the
/// current principal is mutated in place.
///
/// # Why No Default?
///
/// A session always has a principal. Construct with [`Session::new`].
///
/// # Example
///
/// ```
/// use pagegate_auth::{Session, SessionState};
/// use pagegate_types::Principal;
///
/// let admin = Session::new(Principal::new("admin")).with_token("t-admin");
/// let acting = admin.impersonate(Principal::new("bob"));
///
/// assert!(acting.is_impersonating());
/// assert_eq!(acting.principal().login(), "bob");
/// assert_eq!(acting.impersonator().map(|p| p.login()), Some("admin"));
///
/// let restored = acting.stop_impersonating();
/// assert_eq!(restored.state(), SessionState::Normal);
/// assert_eq!(restored.principal().login(), "admin");
/// assert_eq!(restored.token(), Some("t-admin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    principal: Principal,
    token: Option<String>,
    impersonation: Option<ImpersonationLink>,
}

impl Session {
    /// Creates a normal session with no bearer token.
    #[must_use]
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            token: None,
            impersonation: None,
        }
    }

    /// Records the bearer token that established this session.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The principal currently acting.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn impersonation(&self) -> Option<&ImpersonationLink> {
        self.impersonation.as_ref()
    }

    /// The real actor behind an impersonating session.
    #[must_use]
    pub fn impersonator(&self) -> Option<&Principal> {
        self.impersonation.as_ref().map(|link| &link.impersonator)
    }

    #[must_use]
    pub fn is_impersonating(&self) -> bool {
        self.impersonation.is_some()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_impersonating() {
            SessionState::Impersonating
        } else {
            SessionState::Normal
        }
    }

    /// Returns a session acting as `target`.
    ///
    /// Impersonating from an already impersonating session keeps the
    /// original impersonator, so a single stop always returns to the
    /// real actor.
    #[must_use]
    pub fn impersonate(&self, target: Principal) -> Self {
        let link = match &self.impersonation {
            Some(existing) => existing.clone(),
            None => ImpersonationLink {
                impersonator: self.principal.clone(),
                impersonator_token: self.token.clone(),
                started_at: Utc::now(),
            },
        };

        Self {
            principal: target,
            token: None,
            impersonation: Some(link),
        }
    }

    /// Returns the session reverted to the impersonator.
    ///
    /// A normal session is returned unchanged.
    #[must_use]
    pub fn stop_impersonating(&self) -> Self {
        match &self.impersonation {
            Some(link) => Self {
                principal: link.impersonator.clone(),
                token: link.impersonator_token.clone(),
                impersonation: None,
            },
            None => self.clone(),
        }
    }

    /// Touches the acting principal's last-seen timestamp.
    pub fn touch_last_seen(&mut self, at: DateTime<Utc>) {
        self.principal.touch_last_seen(at);
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.impersonator() {
            Some(real) => write!(f, "{}@impersonated-by:{}", self.principal, real.login()),
            None => write!(f, "{}@normal", self.principal),
        }
    }
}

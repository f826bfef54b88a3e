//! Gate error types.
//!
//! Only two things can make the gate fail:
//!
//! ```text
//! GateError
//!   ├── MissingRedirect   policy can deny but has no target (deployment bug)
//!   └── Collaborator      store / resolver / event bus failed (propagated)
//! ```
//!
//! A denial is *not* an error; it is [`Decision::Deny`](crate::Decision)
//! followed by a redirect. An invalid bearer token is not an error either;
//! the request simply continues as a guest.

use crate::SecurityLevel;
use pagegate_types::ErrorCode;
use thiserror::Error;

/// External collaborator that reported a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    AuthStore,
    PageResolver,
    EventBus,
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AuthStore => "auth store",
            Self::PageResolver => "page resolver",
            Self::EventBus => "event bus",
        };
        f.write_str(name)
    }
}

/// Failure reported by a collaborator implementation.
///
/// # Example
///
/// ```
/// use pagegate_auth::CollaboratorError;
/// use pagegate_types::ErrorCode;
///
/// let err = CollaboratorError::page_resolver("no page named 'home'");
/// assert_eq!(err.code(), "COLLAB_PAGE_RESOLVER");
/// assert!(err.to_string().contains("home"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{collaborator} failed: {message}")]
pub struct CollaboratorError {
    pub collaborator: Collaborator,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(collaborator: Collaborator, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            message: message.into(),
        }
    }

    pub fn auth_store(message: impl Into<String>) -> Self {
        Self::new(Collaborator::AuthStore, message)
    }

    pub fn page_resolver(message: impl Into<String>) -> Self {
        Self::new(Collaborator::PageResolver, message)
    }

    pub fn event_bus(message: impl Into<String>) -> Self {
        Self::new(Collaborator::EventBus, message)
    }
}

impl ErrorCode for CollaboratorError {
    fn code(&self) -> &'static str {
        match self.collaborator {
            Collaborator::AuthStore => "COLLAB_AUTH_STORE",
            Collaborator::PageResolver => "COLLAB_PAGE_RESOLVER",
            Collaborator::EventBus => "COLLAB_EVENT_BUS",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

/// Error raised by gate operations.
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | [`GateError::MissingRedirect`] | `GATE_MISSING_REDIRECT` | No |
/// | [`GateError::Collaborator`] | `GATE_COLLABORATOR_FAILED` | Yes |
#[derive(Debug, Clone, Error)]
pub enum GateError {
    /// The policy denied access but names no redirect target.
    ///
    /// Surfaces as a server error; it must be fixed in configuration.
    #[error("redirect property is empty: '{level}' policy denied access with nowhere to send the viewer")]
    MissingRedirect { level: SecurityLevel },

    /// An external collaborator failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl GateError {
    /// Returns `true` for configuration errors.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingRedirect { .. })
    }
}

impl ErrorCode for GateError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingRedirect { .. } => "GATE_MISSING_REDIRECT",
            Self::Collaborator(_) => "GATE_COLLABORATOR_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::MissingRedirect { .. } => false,
            Self::Collaborator(e) => e.is_recoverable(),
        }
    }
}

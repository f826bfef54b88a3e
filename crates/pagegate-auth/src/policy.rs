//! Access policy and its evaluation.
//!
//! An [`AccessPolicy`] states who may view a resource. [`evaluate`] turns
//! a policy plus the viewer's authentication state into a [`Decision`].
//!
//! # Rules
//!
//! ```text
//! authenticated?
//!   ├── yes ── level == Guest                      → Deny
//!   │          allowed_groups ≠ ∅ and G ∩ A = ∅    → Deny
//!   │          otherwise                           → Allow
//!   └── no  ── level == User                       → Deny
//!              otherwise                           → Allow
//! ```
//!
//! Group restrictions only apply to authenticated viewers. A guest on an
//! `All` page with `allowed_groups` set is let through.

use crate::GateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

/// Who a resource is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    /// Anyone, authenticated or not.
    #[default]
    All,
    /// Only viewers without a session.
    Guest,
    /// Only authenticated viewers.
    User,
}

impl SecurityLevel {
    /// Returns the lowercase config name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Guest => "guest",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not `all`, `guest` or `user`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown security level '{0}', expected one of: all, guest, user")]
pub struct ParseSecurityLevelError(pub String);

impl FromStr for SecurityLevel {
    type Err = ParseSecurityLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "guest" => Ok(Self::Guest),
            "user" => Ok(Self::User),
            _ => Err(ParseSecurityLevelError(s.to_string())),
        }
    }
}

/// Declarative access rule for one protected resource.
///
/// # Invariant
///
/// A policy that [can deny](Self::can_deny) must carry a non-empty
/// redirect target. [`validate`](Self::validate) checks this once at
/// load time; the gate re-checks lazily when a denial actually happens.
///
/// # Example
///
/// ```
/// use pagegate_auth::{AccessPolicy, SecurityLevel};
///
/// let policy = AccessPolicy::new(SecurityLevel::User).with_redirect("login");
/// assert!(policy.validate().is_ok());
///
/// let broken = AccessPolicy::new(SecurityLevel::User);
/// assert!(broken.validate().is_err());
///
/// // Open pages never deny, so no redirect is needed
/// assert!(AccessPolicy::default().validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicy {
    /// Who the resource is for.
    #[serde(rename = "security")]
    pub security_level: SecurityLevel,

    /// Group codes allowed in; empty means no group restriction.
    pub allowed_groups: BTreeSet<String>,

    /// Logical page name to send denied viewers to.
    pub redirect: Option<String>,
}

impl AccessPolicy {
    /// Creates a policy with no group restriction and no redirect.
    #[must_use]
    pub fn new(security_level: SecurityLevel) -> Self {
        Self {
            security_level,
            ..Self::default()
        }
    }

    /// Restricts authenticated viewers to the given groups.
    #[must_use]
    pub fn with_allowed_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Sets the redirect page name.
    #[must_use]
    pub fn with_redirect(mut self, page: impl Into<String>) -> Self {
        self.redirect = Some(page.into());
        self
    }

    /// Returns the redirect target, treating blank strings as absent.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect
            .as_deref()
            .map(str::trim)
            .filter(|page| !page.is_empty())
    }

    /// Returns `true` if some viewer could be denied by this policy.
    #[must_use]
    pub fn can_deny(&self) -> bool {
        self.security_level != SecurityLevel::All || !self.allowed_groups.is_empty()
    }

    /// Checks the redirect invariant.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::MissingRedirect`] if the policy can deny but
    /// has nowhere to send the viewer.
    pub fn validate(&self) -> Result<(), GateError> {
        if self.can_deny() && self.redirect_target().is_none() {
            return Err(GateError::MissingRedirect {
                level: self.security_level,
            });
        }
        Ok(())
    }

    /// Evaluates this policy. See [`evaluate`].
    #[must_use]
    pub fn evaluate<S: AsRef<str>>(&self, is_authenticated: bool, user_groups: &[S]) -> Decision {
        evaluate(self, is_authenticated, user_groups)
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny)
    }
}

/// Decides whether a viewer may access a resource.
///
/// Pure and total: the same inputs always give the same [`Decision`].
/// `user_groups` is ignored for unauthenticated viewers.
///
/// # Example
///
/// ```
/// use pagegate_auth::{evaluate, AccessPolicy, Decision, SecurityLevel};
///
/// let admins_only = AccessPolicy::new(SecurityLevel::All)
///     .with_allowed_groups(["admin"])
///     .with_redirect("denied");
///
/// assert_eq!(evaluate(&admins_only, true, &["admin"]), Decision::Allow);
/// assert_eq!(evaluate(&admins_only, true, &["editor"]), Decision::Deny);
/// assert_eq!(evaluate(&admins_only, false, &[] as &[&str]), Decision::Allow);
/// ```
#[must_use]
pub fn evaluate<S: AsRef<str>>(
    policy: &AccessPolicy,
    is_authenticated: bool,
    user_groups: &[S],
) -> Decision {
    if is_authenticated {
        if policy.security_level == SecurityLevel::Guest {
            return Decision::Deny;
        }
        if !policy.allowed_groups.is_empty()
            && !user_groups
                .iter()
                .any(|g| policy.allowed_groups.contains(g.as_ref()))
        {
            return Decision::Deny;
        }
        Decision::Allow
    } else if policy.security_level == SecurityLevel::User {
        Decision::Deny
    } else {
        Decision::Allow
    }
}

/// Pluggable access evaluation.
///
/// The gate evaluates through this trait so hosts can layer extra rules
/// (IP allow-lists, maintenance windows) on top of [`evaluate`].
///
/// # Example
///
/// ```
/// use pagegate_auth::{AccessEvaluator, AccessPolicy, Decision, PolicyEvaluator, SecurityLevel};
///
/// let evaluator: Box<dyn AccessEvaluator> = Box::new(PolicyEvaluator);
/// let policy = AccessPolicy::new(SecurityLevel::Guest).with_redirect("home");
/// let groups: Vec<String> = vec![];
///
/// assert_eq!(evaluator.evaluate(&policy, true, &groups), Decision::Deny);
/// ```
pub trait AccessEvaluator: Send + Sync {
    /// Decides access for one viewer.
    fn evaluate(
        &self,
        policy: &AccessPolicy,
        is_authenticated: bool,
        groups: &[String],
    ) -> Decision;
}

/// The standard rules, as implemented by [`evaluate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyEvaluator;

impl AccessEvaluator for PolicyEvaluator {
    fn evaluate(
        &self,
        policy: &AccessPolicy,
        is_authenticated: bool,
        groups: &[String],
    ) -> Decision {
        evaluate(policy, is_authenticated, groups)
    }
}

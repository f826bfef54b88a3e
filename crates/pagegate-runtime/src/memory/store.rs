//! In-memory [`AuthStore`].

use chrono::{DateTime, Utc};
use pagegate_auth::{AuthStore, CollaboratorError, Session};
use pagegate_types::Principal;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Thread-safe, in-memory session store.
///
/// Holds at most one [`Session`] (the session of the request being
/// served) plus a table of bearer tokens. Every mutation happens under
/// a single write lock, so touch, logout and revert are atomic.
///
/// # Example
///
/// ```
/// use pagegate_auth::AuthStore;
/// use pagegate_runtime::MemoryAuthStore;
/// use pagegate_types::Principal;
///
/// let store = MemoryAuthStore::new();
/// store.register_token("abc123", Principal::new("alice"));
///
/// assert!(store.current_principal().is_none());
/// assert!(store.check_bearer_token("abc123").unwrap());
/// assert_eq!(store.current_principal().unwrap().login(), "alice");
/// assert_eq!(store.current_token().as_deref(), Some("abc123"));
///
/// store.impersonate(Principal::new("bob")).unwrap();
/// assert!(store.is_impersonating());
///
/// store.stop_impersonate().unwrap();
/// assert_eq!(store.current_principal().unwrap().login(), "alice");
/// ```
#[derive(Debug, Default)]
pub struct MemoryAuthStore {
    session: RwLock<Option<Session>>,
    tokens: RwLock<HashMap<String, Principal>>,
}

impl MemoryAuthStore {
    /// Creates a store with no session and no tokens.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already logged in as `principal`.
    #[must_use]
    pub fn logged_in(principal: Principal) -> Self {
        let store = Self::new();
        store.login(principal);
        store
    }

    /// Starts a normal session for `principal`, replacing any current one.
    pub fn login(&self, principal: Principal) {
        *self.session.write() = Some(Session::new(principal));
    }

    /// Makes `token` resolve to `principal`.
    pub fn register_token(&self, token: impl Into<String>, principal: Principal) {
        self.tokens.write().insert(token.into(), principal);
    }

    /// Forgets `token`. Sessions already established with it survive.
    pub fn revoke_token(&self, token: &str) {
        self.tokens.write().remove(token);
    }

    /// Starts acting as `target`.
    ///
    /// # Errors
    ///
    /// Fails when there is no authenticated session to impersonate from.
    pub fn impersonate(&self, target: Principal) -> Result<(), CollaboratorError> {
        let mut guard = self.session.write();
        let current = guard.as_ref().ok_or_else(|| {
            CollaboratorError::auth_store("cannot impersonate without an authenticated session")
        })?;

        debug!(actor = %current.principal(), target = %target, "Impersonation started");
        let next = current.impersonate(target);
        *guard = Some(next);
        Ok(())
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }
}

impl AuthStore for MemoryAuthStore {
    fn current_principal(&self) -> Option<Principal> {
        self.session.read().as_ref().map(|s| s.principal().clone())
    }

    fn current_token(&self) -> Option<String> {
        self.session
            .read()
            .as_ref()
            .and_then(|s| s.token().map(str::to_string))
    }

    fn is_impersonating(&self) -> bool {
        self.session
            .read()
            .as_ref()
            .is_some_and(Session::is_impersonating)
    }

    fn impersonator(&self) -> Option<Principal> {
        self.session
            .read()
            .as_ref()
            .and_then(|s| s.impersonator().cloned())
    }

    fn touch_last_seen(&self, at: DateTime<Utc>) -> Result<Option<Principal>, CollaboratorError> {
        let mut guard = self.session.write();
        Ok(guard.as_mut().map(|session| {
            session.touch_last_seen(at);
            session.principal().clone()
        }))
    }

    fn logout(&self) -> Result<(), CollaboratorError> {
        self.session.write().take();
        Ok(())
    }

    fn stop_impersonate(&self) -> Result<(), CollaboratorError> {
        let mut guard = self.session.write();
        let reverted = guard.as_ref().map(Session::stop_impersonating);
        if reverted.is_some() {
            *guard = reverted;
        }
        Ok(())
    }

    fn check_bearer_token(&self, token: &str) -> Result<bool, CollaboratorError> {
        let Some(principal) = self.tokens.read().get(token).cloned() else {
            return Ok(false);
        };

        *self.session.write() = Some(Session::new(principal).with_token(token));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_guest() {
        let store = MemoryAuthStore::new();
        assert!(store.current_principal().is_none());
        assert!(store.current_token().is_none());
        assert!(!store.is_impersonating());
        assert!(store.impersonator().is_none());
    }

    #[test]
    fn unknown_token_leaves_guest() {
        let store = MemoryAuthStore::new();
        assert!(!store.check_bearer_token("nope").expect("check token"));
        assert!(store.current_principal().is_none());
    }

    #[test]
    fn revoked_token_no_longer_authenticates() {
        let store = MemoryAuthStore::new();
        store.register_token("t", Principal::new("alice"));
        store.revoke_token("t");
        assert!(!store.check_bearer_token("t").expect("check token"));
    }

    #[test]
    fn touch_updates_stored_principal() {
        let store = MemoryAuthStore::logged_in(Principal::new("alice"));
        let now = Utc::now();

        let touched = store
            .touch_last_seen(now)
            .expect("touch")
            .expect("session present");
        assert_eq!(touched.last_seen(), Some(now));
        assert_eq!(
            store.current_principal().and_then(|p| p.last_seen()),
            Some(now)
        );
    }

    #[test]
    fn touch_without_session_returns_none() {
        let store = MemoryAuthStore::new();
        assert!(store.touch_last_seen(Utc::now()).expect("touch").is_none());
    }

    #[test]
    fn logout_is_idempotent() {
        let store = MemoryAuthStore::logged_in(Principal::new("alice"));
        store.logout().expect("logout");
        store.logout().expect("second logout");
        assert!(store.session().is_none());
    }

    #[test]
    fn impersonate_requires_session() {
        let store = MemoryAuthStore::new();
        let err = store
            .impersonate(Principal::new("bob"))
            .expect_err("guest cannot impersonate");
        assert!(err.message.contains("authenticated session"));
    }

    #[test]
    fn impersonation_roundtrip() {
        let store = MemoryAuthStore::logged_in(Principal::new("admin"));
        store.impersonate(Principal::new("bob")).expect("impersonate");

        assert!(store.is_impersonating());
        assert_eq!(store.current_principal().map(|p| p.login().to_string()), Some("bob".into()));
        assert_eq!(store.impersonator().map(|p| p.login().to_string()), Some("admin".into()));

        store.stop_impersonate().expect("stop");
        assert!(!store.is_impersonating());
        assert_eq!(store.current_principal().map(|p| p.login().to_string()), Some("admin".into()));
    }

    #[test]
    fn logout_while_impersonating_clears_everything() {
        let store = MemoryAuthStore::logged_in(Principal::new("admin"));
        store.impersonate(Principal::new("bob")).expect("impersonate");
        store.logout().expect("logout");

        assert!(!store.is_impersonating());
        assert!(store.current_principal().is_none());
    }
}

//! Bearer-token login, run before the policy is evaluated.

use pagegate_auth::{AuthStore, GateError, RequestContext};
use tracing::debug;

/// Turns a bearer token on the request into a session.
///
/// An unknown token is not an error. The request simply continues as
/// a guest and the policy decides what a guest may see.
pub struct TokenAuthenticator<'a> {
    store: &'a dyn AuthStore,
}

impl<'a> TokenAuthenticator<'a> {
    pub fn new(store: &'a dyn AuthStore) -> Self {
        Self { store }
    }

    /// Returns `true` if a session was established from the request's token.
    ///
    /// # Errors
    ///
    /// Propagates store failures. Rejected tokens yield `Ok(false)`.
    pub fn try_authenticate<R>(&self, request: &R) -> Result<bool, GateError>
    where
        R: RequestContext + ?Sized,
    {
        let Some(token) = request.bearer_token() else {
            return Ok(false);
        };

        let accepted = self.store.check_bearer_token(&token)?;
        if accepted {
            debug!("Bearer token accepted");
        } else {
            debug!("Bearer token rejected, continuing as guest");
        }
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryAuthStore, StaticRequest};
    use pagegate_auth::{CollaboratorError, Principal};

    #[test]
    fn no_token_is_noop() {
        let store = MemoryAuthStore::new();
        let auth = TokenAuthenticator::new(&store);

        assert!(!auth
            .try_authenticate(&StaticRequest::new("/"))
            .expect("authenticate"));
        assert!(store.current_principal().is_none());
    }

    #[test]
    fn valid_token_establishes_session() {
        let store = MemoryAuthStore::new();
        store.register_token("abc", Principal::new("alice"));
        let auth = TokenAuthenticator::new(&store);

        let ok = auth
            .try_authenticate(&StaticRequest::new("/").with_bearer("abc"))
            .expect("authenticate");

        assert!(ok);
        assert_eq!(store.current_token().as_deref(), Some("abc"));
    }

    #[test]
    fn invalid_token_is_silent() {
        let store = MemoryAuthStore::new();
        let auth = TokenAuthenticator::new(&store);

        let ok = auth
            .try_authenticate(&StaticRequest::new("/").with_bearer("forged"))
            .expect("rejection is not an error");

        assert!(!ok);
        assert!(store.current_principal().is_none());
    }

    #[test]
    fn store_failure_propagates() {
        struct Offline;
        impl AuthStore for Offline {
            fn current_principal(&self) -> Option<Principal> {
                None
            }
            fn current_token(&self) -> Option<String> {
                None
            }
            fn is_impersonating(&self) -> bool {
                false
            }
            fn impersonator(&self) -> Option<Principal> {
                None
            }
            fn touch_last_seen(
                &self,
                _: chrono::DateTime<chrono::Utc>,
            ) -> Result<Option<Principal>, CollaboratorError> {
                Ok(None)
            }
            fn logout(&self) -> Result<(), CollaboratorError> {
                Ok(())
            }
            fn stop_impersonate(&self) -> Result<(), CollaboratorError> {
                Ok(())
            }
            fn check_bearer_token(&self, _: &str) -> Result<bool, CollaboratorError> {
                Err(CollaboratorError::auth_store("token service unreachable"))
            }
        }

        let err = TokenAuthenticator::new(&Offline)
            .try_authenticate(&StaticRequest::new("/").with_bearer("t"))
            .expect_err("must propagate");
        assert!(matches!(err, GateError::Collaborator(_)));
    }
}

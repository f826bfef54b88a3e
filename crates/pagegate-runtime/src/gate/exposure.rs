//! What the rest of the request pipeline sees of the viewer.

use chrono::Utc;
use pagegate_auth::{AuthStore, GateError, Principal};
use tracing::debug;

/// Read access to the current session, with touch-on-access.
pub struct UserExposure<'a> {
    store: &'a dyn AuthStore,
}

impl<'a> UserExposure<'a> {
    pub fn new(store: &'a dyn AuthStore) -> Self {
        Self { store }
    }

    /// The acting principal.
    ///
    /// Outside impersonation, every call records presence by moving
    /// last-seen to now. While impersonating the record is left alone.
    ///
    /// # Errors
    ///
    /// Propagates store failures from the touch.
    pub fn current_user(&self) -> Result<Option<Principal>, GateError> {
        if self.store.is_impersonating() {
            debug!("Impersonating, last-seen not touched");
            return Ok(self.store.current_principal());
        }

        Ok(self.store.touch_last_seen(Utc::now())?)
    }

    pub fn current_token(&self) -> Option<String> {
        self.store.current_token()
    }

    pub fn current_impersonator(&self) -> Option<Principal> {
        self.store.impersonator()
    }
}

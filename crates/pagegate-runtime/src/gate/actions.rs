//! Logout and stop-impersonating.

use pagegate_auth::{
    AuthStore, CollaboratorError, EventBus, GateError, NotificationSink, Principal, Redirect,
    RequestContext, LOGOUT_MESSAGE, STOP_IMPERSONATE_MESSAGE, USER_LOGOUT_EVENT,
};
use tracing::info;

/// Post parameter naming where to go after a session action.
pub const REDIRECT_PARAM: &str = "redirect";

/// Session-mutating actions.
///
/// Both actions end with a plain redirect to the `redirect` post
/// parameter, falling back to the current URL.
pub struct SessionActions<'a> {
    store: &'a dyn AuthStore,
    events: &'a dyn EventBus,
    notifications: &'a dyn NotificationSink,
}

impl<'a> SessionActions<'a> {
    pub fn new(
        store: &'a dyn AuthStore,
        events: &'a dyn EventBus,
        notifications: &'a dyn NotificationSink,
    ) -> Self {
        Self {
            store,
            events,
            notifications,
        }
    }

    /// Clears the session.
    ///
    /// Emits [`USER_LOGOUT_EVENT`] with the principal as payload, but only
    /// if someone was logged in.
    ///
    /// # Errors
    ///
    /// Propagates store and event bus failures.
    pub fn logout<R>(&self, request: &R) -> Result<Redirect, GateError>
    where
        R: RequestContext + ?Sized,
    {
        let principal = self.store.current_principal();
        self.store.logout()?;

        if let Some(principal) = principal {
            info!(principal = %principal, "Logged out");
            let payload = serde_json::to_value(&principal).map_err(|e| {
                CollaboratorError::event_bus(format!("cannot encode logout payload: {e}"))
            })?;
            self.events.emit(USER_LOGOUT_EVENT, payload)?;
        }

        self.notifications.success(LOGOUT_MESSAGE);
        Ok(after_action(request))
    }

    /// Reverts to the impersonator, or logs out when not impersonating.
    ///
    /// # Errors
    ///
    /// Propagates store and event bus failures.
    pub fn stop_impersonating<R>(&self, request: &R) -> Result<Redirect, GateError>
    where
        R: RequestContext + ?Sized,
    {
        if !self.store.is_impersonating() {
            return self.logout(request);
        }

        self.store.stop_impersonate()?;
        let restored = self.store.current_principal();
        info!(
            principal = ?restored.as_ref().map(Principal::login),
            "Impersonation stopped"
        );

        self.notifications.success(STOP_IMPERSONATE_MESSAGE);
        Ok(after_action(request))
    }
}

fn after_action<R: RequestContext + ?Sized>(request: &R) -> Redirect {
    Redirect::to(request.post_param_or(REDIRECT_PARAM, &request.full_url()))
}

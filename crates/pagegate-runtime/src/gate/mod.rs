//! The access gate.
//!
//! [`AccessGate`] wires the per-request responsibilities together:
//!
//! ```text
//! init_request ──► TokenAuthenticator (if verify_token)
//!                  └─► AjaxInterceptor
//!
//! on_page_enter ─► AccessEvaluator ─┬─ Allow ─► UserExposure ─► PageEntry::Render
//!                                   └─ Deny  ─► RedirectResolver ─► PageEntry::Redirect
//!
//! on_logout / on_stop_impersonating ─► SessionActions ─► Redirect
//! ```
//!
//! A gate is configured once and shared. All per-request state lives in
//! the injected [`AuthStore`].

mod actions;
mod exposure;
mod interceptor;
mod redirect;
mod token;

pub use actions::{SessionActions, REDIRECT_PARAM};
pub use exposure::UserExposure;
pub use interceptor::AjaxInterceptor;
pub use redirect::RedirectResolver;
pub use token::TokenAuthenticator;

use crate::config::{AccessConfig, GateSettings};
use crate::memory::{StaticPageResolver, TracingEventBus, TracingNotifications};
use pagegate_auth::{
    AccessEvaluator, AccessPolicy, AuthStore, Decision, EventBus, GateError, NotificationSink,
    PageResolver, PolicyEvaluator, Principal, Redirect, RequestContext,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// What the page gets to see once access is granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContext {
    pub user: Option<Principal>,
    pub token: Option<String>,
    pub impersonator: Option<Principal>,
}

/// Outcome of [`AccessGate::on_page_enter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEntry {
    /// Access denied; send the viewer elsewhere.
    Redirect(Redirect),
    /// Access granted; render with this context.
    Render(PageContext),
}

impl PageEntry {
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }

    #[must_use]
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            Self::Redirect(r) => Some(r),
            Self::Render(_) => None,
        }
    }

    #[must_use]
    pub fn context(&self) -> Option<&PageContext> {
        match self {
            Self::Render(ctx) => Some(ctx),
            Self::Redirect(_) => None,
        }
    }
}

/// Access-control gate for one protected resource.
///
/// # Example
///
/// ```
/// use pagegate_auth::{Principal, SecurityLevel};
/// use pagegate_runtime::config::AccessConfig;
/// use pagegate_runtime::{AccessGate, MemoryAuthStore, PageEntry, StaticPageResolver};
/// use std::sync::Arc;
///
/// let access = AccessConfig {
///     security: SecurityLevel::User,
///     redirect: Some("login".into()),
///     ..AccessConfig::default()
/// };
/// let store = Arc::new(MemoryAuthStore::new());
/// let gate = AccessGate::builder(access, store.clone())
///     .pages(StaticPageResolver::new([("login", "/account/login")]))
///     .build();
///
/// let entry = gate.on_page_enter().unwrap();
/// assert_eq!(entry.redirect().unwrap().url(), "/account/login");
///
/// store.login(Principal::new("alice"));
/// assert!(matches!(gate.on_page_enter().unwrap(), PageEntry::Render(_)));
/// ```
pub struct AccessGate {
    access: AccessConfig,
    policy: AccessPolicy,
    store: Arc<dyn AuthStore>,
    pages: Arc<dyn PageResolver>,
    events: Arc<dyn EventBus>,
    notifications: Arc<dyn NotificationSink>,
    evaluator: Arc<dyn AccessEvaluator>,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

impl AccessGate {
    /// Starts building a gate for `access` backed by `store`.
    ///
    /// Defaults: identity page resolver, logging event bus and
    /// notifications, [`PolicyEvaluator`].
    pub fn builder(access: AccessConfig, store: Arc<dyn AuthStore>) -> AccessGateBuilder {
        AccessGateBuilder {
            access,
            store,
            pages: Arc::new(StaticPageResolver::identity()),
            events: Arc::new(TracingEventBus),
            notifications: Arc::new(TracingNotifications),
            evaluator: Arc::new(PolicyEvaluator),
        }
    }

    /// Builder preloaded from loaded settings.
    ///
    /// Pages come from the `[pages]` table. Names not in the table are
    /// used as URLs unchanged.
    pub fn from_settings(settings: &GateSettings, store: Arc<dyn AuthStore>) -> AccessGateBuilder {
        Self::builder(settings.access.clone(), store)
            .pages(StaticPageResolver::from(&settings.pages).with_identity_fallback())
    }

    /// Per-request setup, run before any handler.
    ///
    /// Attempts bearer-token login when `verify_token` is on, then hands
    /// back the AJAX interceptor for this request.
    ///
    /// # Errors
    ///
    /// Propagates store failures from token validation.
    pub fn init_request<R>(&self, request: &R) -> Result<AjaxInterceptor<'_>, GateError>
    where
        R: RequestContext + ?Sized,
    {
        if self.access.verify_token {
            TokenAuthenticator::new(self.store.as_ref()).try_authenticate(request)?;
        }
        Ok(AjaxInterceptor::new(self, request.is_ajax()))
    }

    /// Evaluates the policy against the current session.
    #[must_use]
    pub fn check(&self) -> Decision {
        let principal = self.store.current_principal();
        let groups: Vec<String> = principal
            .as_ref()
            .map(|p| p.groups().iter().cloned().collect())
            .unwrap_or_default();

        let decision = self
            .evaluator
            .evaluate(&self.policy, principal.is_some(), &groups);

        debug!(
            level = %self.policy.security_level,
            authenticated = principal.is_some(),
            ?groups,
            ?decision,
            "Policy evaluated"
        );
        decision
    }

    /// The main gate, called once per page render.
    ///
    /// # Errors
    ///
    /// - [`GateError::MissingRedirect`] if access is denied and the
    ///   policy names no redirect
    /// - [`GateError::Collaborator`] on resolver or store failure
    pub fn on_page_enter(&self) -> Result<PageEntry, GateError> {
        if self.check().is_denied() {
            return self.redirect_for_denial().map(PageEntry::Redirect);
        }

        let exposure = self.exposure();
        Ok(PageEntry::Render(PageContext {
            user: exposure.current_user()?,
            token: exposure.current_token(),
            impersonator: exposure.current_impersonator(),
        }))
    }

    /// Logs out and redirects.
    ///
    /// # Errors
    ///
    /// Propagates store and event bus failures.
    pub fn on_logout<R>(&self, request: &R) -> Result<Redirect, GateError>
    where
        R: RequestContext + ?Sized,
    {
        self.actions().logout(request)
    }

    /// Stops impersonating (or logs out) and redirects.
    ///
    /// # Errors
    ///
    /// Propagates store and event bus failures.
    pub fn on_stop_impersonating<R>(&self, request: &R) -> Result<Redirect, GateError>
    where
        R: RequestContext + ?Sized,
    {
        self.actions().stop_impersonating(request)
    }

    /// See [`UserExposure::current_user`].
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn current_user(&self) -> Result<Option<Principal>, GateError> {
        self.exposure().current_user()
    }

    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        self.exposure().current_token()
    }

    #[must_use]
    pub fn current_impersonator(&self) -> Option<Principal> {
        self.exposure().current_impersonator()
    }

    fn redirect_for_denial(&self) -> Result<Redirect, GateError> {
        RedirectResolver::new(self.pages.as_ref()).resolve(&self.policy)
    }

    fn exposure(&self) -> UserExposure<'_> {
        UserExposure::new(self.store.as_ref())
    }

    fn actions(&self) -> SessionActions<'_> {
        SessionActions::new(
            self.store.as_ref(),
            self.events.as_ref(),
            self.notifications.as_ref(),
        )
    }
}

/// Builder for [`AccessGate`].
pub struct AccessGateBuilder {
    access: AccessConfig,
    store: Arc<dyn AuthStore>,
    pages: Arc<dyn PageResolver>,
    events: Arc<dyn EventBus>,
    notifications: Arc<dyn NotificationSink>,
    evaluator: Arc<dyn AccessEvaluator>,
}

impl AccessGateBuilder {
    #[must_use]
    pub fn pages(mut self, pages: impl PageResolver + 'static) -> Self {
        self.pages = Arc::new(pages);
        self
    }

    /// Shares an event bus the caller keeps a handle to.
    #[must_use]
    pub fn events(mut self, events: Arc<dyn EventBus>) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn notifications(mut self, notifications: Arc<dyn NotificationSink>) -> Self {
        self.notifications = notifications;
        self
    }

    /// Replaces the policy evaluator.
    #[must_use]
    pub fn evaluator(mut self, evaluator: impl AccessEvaluator + 'static) -> Self {
        self.evaluator = Arc::new(evaluator);
        self
    }

    /// Builds the gate.
    ///
    /// The policy is not validated here; a denying policy without a
    /// redirect fails on the first denial. Use
    /// [`GateSettings::validate`] to catch that at startup.
    #[must_use]
    pub fn build(self) -> AccessGate {
        let policy = self.access.policy();
        AccessGate {
            access: self.access,
            policy,
            store: self.store,
            pages: self.pages,
            events: self.events,
            notifications: self.notifications,
            evaluator: self.evaluator,
        }
    }
}

//! Contracts with the outside world.
//!
//! The gate never reaches for global state. Everything it needs is
//! injected through these traits:
//!
//! | Trait | Role |
//! |-------|------|
//! | [`AuthStore`] | Current session, logout, impersonation revert, token login |
//! | [`PageResolver`] | Logical page name → URL |
//! | [`EventBus`] | Fire-and-forget notifications (`user.logout`) |
//! | [`RequestContext`] | The incoming request |
//! | [`NotificationSink`] | Flash-style success messages |
//!
//! All calls are synchronous. Implementations that talk to remote
//! systems block until the call completes; failures come back as
//! [`CollaboratorError`] and are propagated by the gate untouched.

use crate::CollaboratorError;
use chrono::{DateTime, Utc};
use pagegate_types::Principal;

/// Event emitted after a logged-in principal logs out.
pub const USER_LOGOUT_EVENT: &str = "user.logout";

/// Message key flashed after logout.
pub const LOGOUT_MESSAGE: &str = "session.logout";

/// Message key flashed after impersonation stops.
pub const STOP_IMPERSONATE_MESSAGE: &str = "session.stop_impersonate_success";

/// Session persistence owned by the host.
///
/// One store instance represents the session of the request being
/// handled. Mutations (`touch_last_seen`, `logout`, `stop_impersonate`)
/// must be atomic with respect to that session: readers never observe
/// a half-cleared or half-reverted state.
pub trait AuthStore: Send + Sync {
    /// The acting principal, or `None` for guests.
    fn current_principal(&self) -> Option<Principal>;

    /// Bearer token that established the session, if any.
    fn current_token(&self) -> Option<String>;

    /// Returns `true` if the session is acting as another principal.
    fn is_impersonating(&self) -> bool;

    /// The real actor while impersonating.
    fn impersonator(&self) -> Option<Principal>;

    /// Records presence of the acting principal at `at`.
    ///
    /// Returns the updated principal, or `None` if there is no session.
    fn touch_last_seen(&self, at: DateTime<Utc>) -> Result<Option<Principal>, CollaboratorError>;

    /// Clears the session. Idempotent.
    fn logout(&self) -> Result<(), CollaboratorError>;

    /// Reverts the session to the impersonator and drops the link.
    ///
    /// A no-op on a session that is not impersonating.
    fn stop_impersonate(&self) -> Result<(), CollaboratorError>;

    /// Validates `token` and, if valid, establishes a session for it.
    ///
    /// Returns `Ok(false)` for unknown or expired tokens. `Err` is
    /// reserved for infrastructure failures.
    fn check_bearer_token(&self, token: &str) -> Result<bool, CollaboratorError>;
}

/// Resolves logical page names (`"login"`) into URLs (`"/account/login"`).
pub trait PageResolver: Send + Sync {
    fn resolve_url(&self, page: &str) -> Result<String, CollaboratorError>;
}

/// Fire-and-forget event notification.
pub trait EventBus: Send + Sync {
    /// Emits `event` with a JSON payload.
    ///
    /// Observers are out of the gate's concern; an `Err` means the bus
    /// itself could not accept the event.
    fn emit(&self, event: &str, payload: serde_json::Value) -> Result<(), CollaboratorError>;
}

/// Flash-style user notifications.
pub trait NotificationSink: Send + Sync {
    /// Queues a success message identified by its localization key.
    fn success(&self, message_key: &str);
}

/// View of the incoming request.
///
/// # Example
///
/// ```
/// use pagegate_auth::RequestContext;
///
/// struct Get;
///
/// impl RequestContext for Get {
///     fn is_ajax(&self) -> bool { false }
///     fn bearer_token(&self) -> Option<String> { None }
///     fn full_url(&self) -> String { "https://example.com/profile".into() }
///     fn post_param(&self, _name: &str) -> Option<String> { None }
/// }
///
/// assert_eq!(Get.post_param_or("redirect", "/fallback"), "/fallback");
/// ```
pub trait RequestContext {
    /// Returns `true` for AJAX handler requests.
    fn is_ajax(&self) -> bool;

    /// Bearer token from the `Authorization` header.
    ///
    /// See [`parse_bearer`] for header parsing.
    fn bearer_token(&self) -> Option<String>;

    /// The full URL of the current request, including the query string.
    fn full_url(&self) -> String;

    /// A form/body parameter.
    fn post_param(&self, name: &str) -> Option<String>;

    /// A form/body parameter, or `default` when missing or blank.
    fn post_param_or(&self, name: &str, default: &str) -> String {
        self.post_param(name)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// The scheme match is case-insensitive. A missing or blank token
/// yields `None`.
///
/// # Example
///
/// ```
/// use pagegate_auth::parse_bearer;
///
/// assert_eq!(parse_bearer("Bearer abc123"), Some("abc123"));
/// assert_eq!(parse_bearer("bearer   abc123 "), Some("abc123"));
/// assert_eq!(parse_bearer("Basic dXNlcjpwYXNz"), None);
/// assert_eq!(parse_bearer("Bearer "), None);
/// ```
#[must_use]
pub fn parse_bearer(header: &str) -> Option<&str> {
    let header = header.trim();
    let (scheme, token) = header.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

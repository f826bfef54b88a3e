//! Redirect instructions produced by the gate.

use serde::{Deserialize, Serialize};

/// How a redirect should be issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectKind {
    /// Access was denied; the viewer is sent away but keeps their session.
    ///
    /// Hosts typically remember the originally requested URL so the
    /// viewer can return after logging in.
    Guest,
    /// Plain redirect after a session action (logout, stop impersonating).
    Plain,
}

impl RedirectKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Plain => "plain",
        }
    }
}

/// A redirect the host framework should perform.
///
/// # Example
///
/// ```
/// use pagegate_auth::{Redirect, RedirectKind};
///
/// let denied = Redirect::guest("/login");
/// assert_eq!(denied.url(), "/login");
/// assert_eq!(denied.kind(), RedirectKind::Guest);
///
/// let after_logout = Redirect::to("/bye");
/// assert_eq!(after_logout.kind(), RedirectKind::Plain);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    url: String,
    kind: RedirectKind,
}

impl Redirect {
    /// Redirect for a denied viewer.
    #[must_use]
    pub fn guest(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: RedirectKind::Guest,
        }
    }

    /// Redirect after a session action.
    #[must_use]
    pub fn to(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: RedirectKind::Plain,
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn kind(&self) -> RedirectKind {
        self.kind
    }

    /// Converts into the instruction returned to AJAX callers.
    #[must_use]
    pub fn into_ajax(self) -> AjaxRedirect {
        AjaxRedirect { redirect: self.url }
    }
}

impl std::fmt::Display for Redirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "redirect({}) -> {}", self.kind.as_str(), self.url)
    }
}

/// Short-circuit response for AJAX requests.
///
/// AJAX handlers cannot follow an HTTP redirect for the page, so the
/// target is returned as a JSON instruction instead:
/// `{"redirect": "<url>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AjaxRedirect {
    pub redirect: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ajax_instruction_keeps_url() {
        let ajax = Redirect::guest("/login").into_ajax();
        assert_eq!(ajax.redirect, "/login");
        assert_eq!(
            serde_json::to_value(&ajax).expect("serialize"),
            serde_json::json!({ "redirect": "/login" })
        );
    }

    #[test]
    fn display_includes_kind() {
        assert_eq!(Redirect::guest("/a").to_string(), "redirect(guest) -> /a");
        assert_eq!(Redirect::to("/b").to_string(), "redirect(plain) -> /b");
    }
}

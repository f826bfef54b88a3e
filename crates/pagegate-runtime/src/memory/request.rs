//! Builder-style [`RequestContext`].

use pagegate_auth::{parse_bearer, RequestContext};
use std::collections::HashMap;

/// A fully specified request, for tests and the CLI.
///
/// # Example
///
/// ```
/// use pagegate_auth::RequestContext;
/// use pagegate_runtime::StaticRequest;
///
/// let req = StaticRequest::new("https://example.com/account")
///     .ajax()
///     .with_authorization("Bearer abc123")
///     .with_post_param("redirect", "/bye");
///
/// assert!(req.is_ajax());
/// assert_eq!(req.bearer_token().as_deref(), Some("abc123"));
/// assert_eq!(req.post_param_or("redirect", "/"), "/bye");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticRequest {
    url: String,
    ajax: bool,
    authorization: Option<String>,
    post: HashMap<String, String>,
}

impl StaticRequest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Marks the request as coming from an AJAX handler.
    #[must_use]
    pub fn ajax(mut self) -> Self {
        self.ajax = true;
        self
    }

    /// Sets the raw `Authorization` header value.
    #[must_use]
    pub fn with_authorization(mut self, header: impl Into<String>) -> Self {
        self.authorization = Some(header.into());
        self
    }

    /// Shorthand for `with_authorization(format!("Bearer {token}"))`.
    #[must_use]
    pub fn with_bearer(self, token: &str) -> Self {
        self.with_authorization(format!("Bearer {token}"))
    }

    #[must_use]
    pub fn with_post_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.post.insert(name.into(), value.into());
        self
    }
}

impl RequestContext for StaticRequest {
    fn is_ajax(&self) -> bool {
        self.ajax
    }

    fn bearer_token(&self) -> Option<String> {
        self.authorization
            .as_deref()
            .and_then(parse_bearer)
            .map(str::to_string)
    }

    fn full_url(&self) -> String {
        self.url.clone()
    }

    fn post_param(&self, name: &str) -> Option<String> {
        self.post.get(name).cloned()
    }
}

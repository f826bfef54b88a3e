//! Table-driven [`PageResolver`].

use pagegate_auth::{CollaboratorError, PageResolver};
use std::collections::BTreeMap;

/// Resolves logical page names through a fixed table.
///
/// Unknown names fail unless identity fallback is enabled, in which
/// case the name itself is returned as the URL.
///
/// # Example
///
/// ```
/// use pagegate_auth::PageResolver;
/// use pagegate_runtime::StaticPageResolver;
///
/// let pages = StaticPageResolver::new([("login", "/account/login")]);
/// assert_eq!(pages.resolve_url("login").unwrap(), "/account/login");
/// assert!(pages.resolve_url("home").is_err());
///
/// let pages = pages.with_identity_fallback();
/// assert_eq!(pages.resolve_url("home").unwrap(), "home");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticPageResolver {
    table: BTreeMap<String, String>,
    identity_fallback: bool,
}

impl StaticPageResolver {
    /// Creates a resolver over `table` without fallback.
    pub fn new<I, K, V>(table: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: table
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            identity_fallback: false,
        }
    }

    /// A resolver that returns every name unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self::default().with_identity_fallback()
    }

    /// Returns unknown names unchanged instead of failing.
    #[must_use]
    pub fn with_identity_fallback(mut self) -> Self {
        self.identity_fallback = true;
        self
    }

    /// Number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl From<&BTreeMap<String, String>> for StaticPageResolver {
    fn from(table: &BTreeMap<String, String>) -> Self {
        Self::new(table.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

impl PageResolver for StaticPageResolver {
    fn resolve_url(&self, page: &str) -> Result<String, CollaboratorError> {
        match self.table.get(page) {
            Some(url) => Ok(url.clone()),
            None if self.identity_fallback => Ok(page.to_string()),
            None => Err(CollaboratorError::page_resolver(format!(
                "no page named '{page}'"
            ))),
        }
    }
}

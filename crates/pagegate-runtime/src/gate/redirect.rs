//! Denial → redirect.

use pagegate_auth::{AccessPolicy, GateError, PageResolver, Redirect};
use tracing::warn;

/// Maps a denied request to the policy's redirect page.
pub struct RedirectResolver<'a> {
    pages: &'a dyn PageResolver,
}

impl<'a> RedirectResolver<'a> {
    pub fn new(pages: &'a dyn PageResolver) -> Self {
        Self { pages }
    }

    /// Resolves the redirect for a denial under `policy`.
    ///
    /// # Errors
    ///
    /// - [`GateError::MissingRedirect`] if the policy has no target
    /// - [`GateError::Collaborator`] if the page cannot be resolved
    pub fn resolve(&self, policy: &AccessPolicy) -> Result<Redirect, GateError> {
        let Some(page) = policy.redirect_target() else {
            warn!(level = %policy.security_level, "Access denied but no redirect is configured");
            return Err(GateError::MissingRedirect {
                level: policy.security_level,
            });
        };

        let url = self.pages.resolve_url(page)?;
        Ok(Redirect::guest(url))
    }
}

//! Pre-render short-circuit for AJAX requests.

use super::AccessGate;
use pagegate_auth::{AjaxRedirect, GateError};
use tracing::debug;

/// Returned by [`AccessGate::init_request`].
///
/// Page handlers can redirect the browser; AJAX handlers cannot. Before
/// an AJAX handler runs, the host calls [`intercept`](Self::intercept)
/// and, if it gets an [`AjaxRedirect`], sends that back instead of
/// running the handler.
pub struct AjaxInterceptor<'g> {
    gate: &'g AccessGate,
    is_ajax: bool,
}

impl<'g> AjaxInterceptor<'g> {
    pub(super) fn new(gate: &'g AccessGate, is_ajax: bool) -> Self {
        Self { gate, is_ajax }
    }

    /// Returns `true` if this interceptor can short-circuit at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_ajax
    }

    /// Evaluates the policy for an AJAX request.
    ///
    /// Non-AJAX requests always pass through with `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Same as [`AccessGate::on_page_enter`] on denial.
    pub fn intercept(&self) -> Result<Option<AjaxRedirect>, GateError> {
        if !self.is_ajax {
            return Ok(None);
        }

        if self.gate.check().is_allowed() {
            return Ok(None);
        }

        let redirect = self.gate.redirect_for_denial()?;
        debug!(url = redirect.url(), "AJAX request denied");
        Ok(Some(redirect.into_ajax()))
    }
}

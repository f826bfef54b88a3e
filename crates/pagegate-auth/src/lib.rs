//! Access-control primitives for pagegate.
//!
//! This crate defines *what* the gate decides and *whom* it talks to.
//! The gate itself, configuration loading and reference collaborator
//! implementations live in `pagegate-runtime`.
//!
//! # Decision Model
//!
//! ```text
//! AccessPolicy ──┐
//! authenticated ─┼──► evaluate() ──► Decision::Allow ──► expose user
//! user groups ───┘                └─► Decision::Deny  ──► Redirect
//! ```
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`policy`] | [`SecurityLevel`], [`AccessPolicy`], [`Decision`], [`evaluate`] |
//! | [`session`] | [`Session`], [`ImpersonationLink`], [`SessionState`] |
//! | [`redirect`] | [`Redirect`], [`RedirectKind`], [`AjaxRedirect`] |
//! | [`collaborator`] | [`AuthStore`], [`PageResolver`], [`EventBus`], [`RequestContext`], [`NotificationSink`] |
//! | [`error`] | [`GateError`], [`CollaboratorError`] |
//!
//! # Design Principles
//!
//! - **Traits here, implementations in consumers**: the runtime crate and
//!   host frameworks provide concrete stores and resolvers.
//! - **Denial is not an error**: only misconfiguration and collaborator
//!   failures are `Err`.

pub mod collaborator;
pub mod error;
pub mod policy;
pub mod redirect;
pub mod session;

pub use collaborator::{
    parse_bearer, AuthStore, EventBus, NotificationSink, PageResolver, RequestContext,
    LOGOUT_MESSAGE, STOP_IMPERSONATE_MESSAGE, USER_LOGOUT_EVENT,
};
pub use error::{Collaborator, CollaboratorError, GateError};
pub use policy::{
    evaluate, AccessEvaluator, AccessPolicy, Decision, ParseSecurityLevelError, PolicyEvaluator,
    SecurityLevel,
};
pub use redirect::{AjaxRedirect, Redirect, RedirectKind};
pub use session::{ImpersonationLink, Session, SessionState};

// Re-export Principal from pagegate_types for convenience
pub use pagegate_types::Principal;

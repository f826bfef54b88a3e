//! pagegate runtime.
//!
//! Puts the primitives from `pagegate-auth` to work:
//!
//! - [`gate`]: the [`AccessGate`] and its per-request responsibilities
//! - [`config`]: layered TOML + environment configuration
//! - [`memory`]: in-memory collaborators for tests, the CLI and demos
//!
//! # Example
//!
//! ```
//! use pagegate_auth::{Principal, SecurityLevel};
//! use pagegate_runtime::config::AccessConfig;
//! use pagegate_runtime::{AccessGate, MemoryAuthStore, StaticRequest};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryAuthStore::logged_in(Principal::new("alice")));
//! let gate = AccessGate::builder(AccessConfig::default(), store.clone()).build();
//!
//! let redirect = gate
//!     .on_logout(&StaticRequest::new("/account").with_post_param("redirect", "/bye"))
//!     .unwrap();
//!
//! assert_eq!(redirect.url(), "/bye");
//! assert!(gate.current_user().unwrap().is_none());
//! ```

pub mod config;
pub mod gate;
pub mod memory;

pub use gate::{
    AccessGate, AccessGateBuilder, AjaxInterceptor, PageContext, PageEntry, RedirectResolver,
    SessionActions, TokenAuthenticator, UserExposure, REDIRECT_PARAM,
};
pub use memory::{
    MemoryAuthStore, RecordedEvent, RecordingEventBus, RecordingNotifications,
    StaticPageResolver, StaticRequest, TracingEventBus, TracingNotifications,
};

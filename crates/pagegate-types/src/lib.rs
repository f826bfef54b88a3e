//! Core types for pagegate.
//!
//! This crate holds the identity primitives shared by every other
//! pagegate crate. It carries no access-control logic.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  pagegate-types   : PrincipalId, Principal, ErrorCode ◄ HERE │
//! │  pagegate-auth    : AccessPolicy, Session, collaborators    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  pagegate-runtime : AccessGate, config, memory stores       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  pagegate-cli     : request simulation / config validation  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pagegate_types::{Principal, PrincipalId};
//!
//! let alice = Principal::new("alice").with_groups(["editor"]);
//! assert!(alice.in_group("editor"));
//! assert!(alice.last_seen().is_none());
//!
//! let other = PrincipalId::new();
//! assert_ne!(alice.id(), other);
//! ```

mod error;
mod id;
mod principal;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::PrincipalId;
pub use principal::Principal;

//! Machine-readable error codes.
//!
//! Every pagegate error type implements [`ErrorCode`] so that a host
//! application can map failures to HTTP status classes or log fields
//! without matching on concrete enums.
//!
//! # Example
//!
//! ```
//! use pagegate_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LookupError {
//!     UnknownPage(String),
//!     Unreachable,
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::UnknownPage(_) => "LOOKUP_UNKNOWN_PAGE",
//!             Self::Unreachable => "LOOKUP_UNREACHABLE",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Unreachable)
//!     }
//! }
//!
//! let err = LookupError::UnknownPage("home".into());
//! assert_eq!(err.code(), "LOOKUP_UNKNOWN_PAGE");
//! assert!(!err.is_recoverable());
//! ```

/// Error code interface shared by all pagegate errors.
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE
/// - Prefixed with the owning layer (`GATE_`, `CONFIG_`, ...)
/// - Stable once published
///
/// # Recoverability
///
/// Recoverable means a retry or an operator action at request time may
/// succeed (a collaborator was briefly unavailable). Misconfiguration is
/// not recoverable: it needs a deployment change.
pub trait ErrorCode {
    /// Returns the machine-readable code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code is non-empty, prefixed and UPPER_SNAKE_CASE.
///
/// Intended for tests.
///
/// # Panics
///
/// Panics with a descriptive message if any check fails.
///
/// # Example
///
/// ```
/// use pagegate_types::{ErrorCode, assert_error_code};
///
/// struct Timeout;
///
/// impl ErrorCode for Timeout {
///     fn code(&self) -> &'static str { "GATE_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Timeout, "GATE_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Runs [`assert_error_code`] over every error in `errors`.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    errors
        .iter()
        .for_each(|err| assert_error_code(err, expected_prefix));
}

fn is_upper_snake_case(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('_')
        && !s.ends_with('_')
        && !s.contains("__")
        && s
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

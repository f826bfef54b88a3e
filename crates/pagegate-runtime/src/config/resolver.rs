//! Configuration resolver trait for layered overrides.
//!
//! ```text
//! ConfigLoader.load()  →  GateSettings (base)
//!                              │
//!                              ▼
//!                     ConfigResolver.apply()
//!                              │
//!                              ▼
//!                     GateSettings (final) → validate()
//! ```

use super::GateSettings;

/// Applies overrides on top of loaded settings.
///
/// Only values the resolver actually carries should be applied;
/// unspecified options keep their loaded value.
///
/// # Example
///
/// ```
/// use pagegate_runtime::config::{ConfigResolver, GateSettings};
/// use pagegate_auth::SecurityLevel;
///
/// struct ForceLogin;
///
/// impl ConfigResolver for ForceLogin {
///     fn apply(&self, config: &mut GateSettings) {
///         config.access.security = SecurityLevel::User;
///     }
/// }
///
/// let mut config = GateSettings::default();
/// ForceLogin.apply(&mut config);
/// assert_eq!(config.access.security, SecurityLevel::User);
/// ```
pub trait ConfigResolver {
    fn apply(&self, config: &mut GateSettings);
}

/// Resolver that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResolver;

impl ConfigResolver for NoOpResolver {
    fn apply(&self, _config: &mut GateSettings) {}
}

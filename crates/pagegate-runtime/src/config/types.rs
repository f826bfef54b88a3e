//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use super::ConfigError;
use pagegate_auth::{AccessPolicy, SecurityLevel};
use pagegate_types::Principal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use pagegate_runtime::config::GateSettings;
/// use pagegate_auth::SecurityLevel;
///
/// let settings = GateSettings::from_toml(r#"
/// [access]
/// security = "user"
/// redirect = "login"
///
/// [pages]
/// login = "/account/login"
/// "#).unwrap();
///
/// assert_eq!(settings.access.security, SecurityLevel::User);
/// assert_eq!(settings.pages["login"], "/account/login");
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateSettings {
    /// Enable debug logging.
    pub debug: bool,

    /// Access policy for the guarded resource.
    pub access: AccessConfig,

    /// Logical page name → URL table used by the page resolver.
    pub pages: BTreeMap<String, String>,

    /// Bearer token → principal fixtures for the in-memory store.
    pub tokens: BTreeMap<String, TokenFixture>,
}

impl GateSettings {
    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Checks the access policy once, at startup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPolicy`] when the policy can deny
    /// but no redirect is configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.access
            .policy()
            .validate()
            .map_err(ConfigError::InvalidPolicy)
    }

    /// Applies one config file layer on top of these settings.
    ///
    /// Every key the layer sets wins, including keys set back to their
    /// default. `allowed_groups` replaces the lower layer's set. The
    /// `[pages]` and `[tokens]` tables merge by key.
    pub fn apply_layer(&mut self, layer: &SettingsLayer) {
        if let Some(debug) = layer.debug {
            self.debug = debug;
        }

        self.access.apply_layer(&layer.access);
        self.pages.extend(layer.pages.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.tokens.extend(layer.tokens.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

/// Gate configuration for one guarded resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccessConfig {
    /// Who may view the resource.
    pub security: SecurityLevel,

    /// Groups allowed in (empty = any authenticated user).
    pub allowed_groups: BTreeSet<String>,

    /// Logical page to redirect denied viewers to.
    pub redirect: Option<String>,

    /// Try bearer-token login before evaluating the policy.
    pub verify_token: bool,
}

impl AccessConfig {
    /// Builds the access policy described by this config.
    #[must_use]
    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy {
            security_level: self.security,
            allowed_groups: self.allowed_groups.clone(),
            redirect: self.redirect.clone(),
        }
    }

    fn apply_layer(&mut self, layer: &AccessLayer) {
        if let Some(security) = layer.security {
            self.security = security;
        }
        if let Some(ref groups) = layer.allowed_groups {
            self.allowed_groups.clone_from(groups);
        }
        if layer.redirect.is_some() {
            self.redirect.clone_from(&layer.redirect);
        }
        if let Some(verify_token) = layer.verify_token {
            self.verify_token = verify_token;
        }
    }
}

impl From<&AccessConfig> for AccessPolicy {
    fn from(config: &AccessConfig) -> Self {
        config.policy()
    }
}

/// One config file as written: only the keys it sets are `Some`.
///
/// # Example
///
/// ```
/// use pagegate_runtime::config::{GateSettings, SettingsLayer};
/// use pagegate_auth::SecurityLevel;
///
/// let mut settings = GateSettings::from_toml("[access]\nsecurity = \"user\"\n").unwrap();
/// let project = SettingsLayer::from_toml("[access]\nsecurity = \"all\"\n").unwrap();
///
/// settings.apply_layer(&project);
/// assert_eq!(settings.access.security, SecurityLevel::All);
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettingsLayer {
    pub debug: Option<bool>,
    pub access: AccessLayer,
    pub pages: BTreeMap<String, String>,
    pub tokens: BTreeMap<String, TokenFixture>,
}

impl SettingsLayer {
    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

/// The `[access]` table of a [`SettingsLayer`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccessLayer {
    pub security: Option<SecurityLevel>,
    pub allowed_groups: Option<BTreeSet<String>>,
    pub redirect: Option<String>,
    pub verify_token: Option<bool>,
}

/// A principal reachable through a bearer token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TokenFixture {
    pub login: String,
    pub groups: BTreeSet<String>,
}

impl TokenFixture {
    /// Builds a fresh principal for this fixture.
    #[must_use]
    pub fn to_principal(&self) -> Principal {
        Principal::new(self.login.clone()).with_groups(self.groups.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GateSettings::default();
        assert!(!config.debug);
        assert_eq!(config.access.security, SecurityLevel::All);
        assert!(config.access.allowed_groups.is_empty());
        assert!(config.access.redirect.is_none());
        assert!(!config.access.verify_token);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = GateSettings::default();
        config.access.security = SecurityLevel::Guest;
        config.access.redirect = Some("home".into());
        config.pages.insert("home".into(), "/".into());

        let toml = config.to_toml().expect("serialize");
        let back = GateSettings::from_toml(&toml).expect("parse");
        assert_eq!(config, back);
    }

    #[test]
    fn toml_partial_parse() {
        let config = GateSettings::from_toml(
            r#"
[access]
allowed_groups = ["admin"]
"#,
        )
        .expect("parse");

        assert_eq!(config.access.security, SecurityLevel::All);
        assert!(config.access.allowed_groups.contains("admin"));
        assert!(!config.debug);
    }

    #[test]
    fn token_fixtures_parse() {
        let config = GateSettings::from_toml(
            r#"
[tokens.abc123]
login = "alice"
groups = ["admin", "staff"]
"#,
        )
        .expect("parse");

        let principal = config.tokens["abc123"].to_principal();
        assert_eq!(principal.login(), "alice");
        assert!(principal.in_group("staff"));
    }

    fn layer(toml: &str) -> SettingsLayer {
        SettingsLayer::from_toml(toml).expect("parse layer")
    }

    #[test]
    fn layer_overrides_set_keys() {
        let mut base = GateSettings::default();
        base.access.redirect = Some("login".into());

        base.apply_layer(&layer(
            r#"
debug = true

[access]
security = "user"
verify_token = true
"#,
        ));

        assert!(base.debug);
        assert_eq!(base.access.security, SecurityLevel::User);
        assert!(base.access.verify_token);
        assert_eq!(base.access.redirect.as_deref(), Some("login"));
    }

    #[test]
    fn layer_can_restore_defaults() {
        let mut base = GateSettings::default();
        base.debug = true;
        base.access.security = SecurityLevel::User;
        base.access.verify_token = true;

        base.apply_layer(&layer(
            r#"
debug = false

[access]
security = "all"
verify_token = false
"#,
        ));

        assert!(!base.debug);
        assert_eq!(base.access.security, SecurityLevel::All);
        assert!(!base.access.verify_token);
    }

    #[test]
    fn layer_groups_replace_and_tables_merge() {
        let mut base = GateSettings::default();
        base.access.allowed_groups.insert("admin".into());
        base.pages.insert("login".into(), "/login".into());

        base.apply_layer(&layer(
            r#"
[access]
allowed_groups = ["staff"]

[pages]
login = "/account/login"
home = "/"
"#,
        ));

        assert_eq!(
            base.access.allowed_groups.iter().collect::<Vec<_>>(),
            vec!["staff"]
        );
        assert_eq!(base.pages["login"], "/account/login");
        assert_eq!(base.pages["home"], "/");
    }

    #[test]
    fn empty_layer_changes_nothing() {
        let mut base = GateSettings::default();
        base.access.security = SecurityLevel::Guest;
        base.access.allowed_groups.insert("admin".into());
        base.access.redirect = Some("home".into());
        let original = base.clone();

        base.apply_layer(&layer(""));
        assert_eq!(base, original);
    }

    #[test]
    fn validate_rejects_denying_policy_without_redirect() {
        let mut config = GateSettings::default();
        config.access.security = SecurityLevel::User;

        let err = config.validate().expect_err("should be invalid");
        assert!(matches!(err, ConfigError::InvalidPolicy(_)));
    }

    #[test]
    fn policy_mirrors_access_config() {
        let config = AccessConfig {
            security: SecurityLevel::User,
            allowed_groups: ["admin".to_string()].into_iter().collect(),
            redirect: Some("login".into()),
            verify_token: true,
        };
        let policy = AccessPolicy::from(&config);

        assert_eq!(policy.security_level, SecurityLevel::User);
        assert!(policy.allowed_groups.contains("admin"));
        assert_eq!(policy.redirect_target(), Some("login"));
    }
}

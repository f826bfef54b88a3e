//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.pagegate/config.toml`)
//! 3. Project config (`<root>/.pagegate/config.toml`)
//! 4. Environment variables (`PAGEGATE_*`)
//!
//! Each layer overrides the keys it sets, even when it sets them back
//! to their default. Group lists replace, page and token tables merge
//! by key.

use super::{
    default_config_path, ConfigError, GateSettings, SettingsLayer, PROJECT_CONFIG_DIR,
    PROJECT_CONFIG_FILE,
};
use pagegate_auth::SecurityLevel;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Helper macro for parsing boolean environment variables.
macro_rules! parse_env_bool {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use pagegate_runtime::config::ConfigLoader;
///
/// let settings = ConfigLoader::new()
///     .with_project_root("/srv/site")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), pagegate_runtime::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.pagegate/config.toml).
    global_config_path: Option<PathBuf>,

    /// Project root directory.
    project_root: Option<PathBuf>,

    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config will be loaded from `<project_root>/.pagegate/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    ///
    /// Useful for testing with deterministic config.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// The result is not validated; call
    /// [`GateSettings::validate`] before serving requests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read
    /// or parsed, or an environment variable holds an invalid value.
    /// Missing config files are silently ignored.
    pub fn load(&self) -> Result<GateSettings, ConfigError> {
        let mut config = GateSettings::default();

        // Layer 1: Global config
        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global_config) = self.load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.apply_layer(&global_config);
            }
        }

        // Layer 2: Project config
        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let project_config_path = project_root
                    .join(PROJECT_CONFIG_DIR)
                    .join(PROJECT_CONFIG_FILE);

                if let Some(project_config) = self.load_file(&project_config_path)? {
                    debug!(
                        path = %project_config_path.display(),
                        project = %project_root.display(),
                        "Loaded project config"
                    );
                    config.apply_layer(&project_config);
                }
            }
        }

        // Layer 3: Environment variables
        if !self.skip_env {
            apply_env_vars(&mut config)?;
        }

        Ok(config)
    }

    fn load_file(&self, path: &Path) -> Result<Option<SettingsLayer>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let layer =
            SettingsLayer::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

        Ok(Some(layer))
    }
}

fn apply_env_vars(config: &mut GateSettings) -> Result<(), ConfigError> {
    parse_env_bool!(config.debug, "PAGEGATE_DEBUG");
    parse_env_bool!(config.access.verify_token, "PAGEGATE_VERIFY_TOKEN");

    if let Ok(val) = std::env::var("PAGEGATE_SECURITY") {
        config.access.security = val
            .parse::<SecurityLevel>()
            .map_err(|e| ConfigError::invalid_env_var("PAGEGATE_SECURITY", e.to_string()))?;
    }

    if let Ok(val) = std::env::var("PAGEGATE_REDIRECT") {
        config.access.redirect = Some(val);
    }

    // Comma-separated, replaces file-provided groups
    if let Ok(val) = std::env::var("PAGEGATE_ALLOWED_GROUPS") {
        config.access.allowed_groups = split_list(&val).collect();
    }

    Ok(())
}

/// Splits a comma-separated list, dropping blank entries.
fn split_list(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off" (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

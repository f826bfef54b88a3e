//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌─────────────────────────────────────────────┐
//! │  1. ConfigResolver overrides (CLI flags)    │
//! ├─────────────────────────────────────────────┤
//! │  2. Environment Variables (PAGEGATE_*)      │
//! ├─────────────────────────────────────────────┤
//! │  3. Project Config (.pagegate/config.toml)  │
//! ├─────────────────────────────────────────────┤
//! │  4. Global Config (~/.pagegate/config.toml) │
//! ├─────────────────────────────────────────────┤
//! │  5. Default Values (compile-time)           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `PAGEGATE_DEBUG` | `debug` | bool |
//! | `PAGEGATE_SECURITY` | `access.security` | `all` \| `guest` \| `user` |
//! | `PAGEGATE_REDIRECT` | `access.redirect` | String |
//! | `PAGEGATE_ALLOWED_GROUPS` | `access.allowed_groups` | comma list |
//! | `PAGEGATE_VERIFY_TOKEN` | `access.verify_token` | bool |
//!
//! # Example Configuration
//!
//! ```toml
//! debug = false
//!
//! [access]
//! security = "user"
//! allowed_groups = ["admin"]
//! redirect = "login"
//! verify_token = true
//!
//! [pages]
//! login = "/account/login"
//!
//! [tokens.abc123]
//! login = "alice"
//! groups = ["admin"]
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::{ConfigResolver, NoOpResolver};
pub use types::{AccessConfig, AccessLayer, GateSettings, SettingsLayer, TokenFixture};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(PROJECT_CONFIG_DIR)
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join(PROJECT_CONFIG_FILE)
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".pagegate";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";

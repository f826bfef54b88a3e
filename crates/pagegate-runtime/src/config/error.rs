//! Configuration errors.

use pagegate_auth::GateError;
use pagegate_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config file '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid environment variable value.
    #[error("invalid value for environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    /// The merged access policy breaks the redirect invariant.
    #[error("invalid access policy: {0}")]
    InvalidPolicy(#[source] GateError),
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "CONFIG_READ_FILE",
            Self::ParseToml { .. } => "CONFIG_PARSE_TOML",
            Self::InvalidEnvVar { .. } => "CONFIG_INVALID_ENV_VAR",
            Self::InvalidPolicy(_) => "CONFIG_INVALID_POLICY",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::ReadFile { .. })
    }
}

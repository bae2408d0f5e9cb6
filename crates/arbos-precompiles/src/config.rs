//! Configuration of the active precompile set.

use std::env;
use thiserror::Error;

/// Environment variable enabling debug-only precompiles.
pub const DEBUG_PRECOMPILES_ENV: &str = "ARBOS_DEBUG_PRECOMPILES";

/// Selects which built-in precompiles are installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrecompilesConfig {
    /// Whether debug-only precompiles such as `ArbDebug` are active.
    pub debug_precompiles: bool,
}

impl PrecompilesConfig {
    /// Configuration with every built-in precompile enabled.
    pub const fn all() -> Self {
        Self {
            debug_precompiles: true,
        }
    }

    /// Loads the configuration from [`DEBUG_PRECOMPILES_ENV`].
    ///
    /// A missing or empty variable leaves debug precompiles disabled.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(DEBUG_PRECOMPILES_ENV) {
            Ok(raw) if raw.trim().is_empty() => Ok(Self::default()),
            Ok(raw) => Ok(Self {
                debug_precompiles: parse_bool(DEBUG_PRECOMPILES_ENV, &raw)?,
            }),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode {
                var: DEBUG_PRECOMPILES_ENV.into(),
            }),
        }
    }
}

/// Errors that can occur while loading a [`PrecompilesConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The variable holds something other than a boolean.
    #[error("environment variable {var} must be a boolean, got `{value}`")]
    InvalidBool {
        /// Name of the variable.
        var: String,
        /// Raw value that failed to parse.
        value: String,
    },
    /// The variable is not valid unicode.
    #[error("environment variable {var} is not valid unicode")]
    NotUnicode {
        /// Name of the variable.
        var: String,
    },
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var: var.into(),
            value: raw.into(),
        }),
    }
}

//! Roller configuration and its TOML loader.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::Limits;


/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read the file.
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}


/// Everything a roll needs to know besides the pattern.
///
/// Every field has a default, so a partial TOML file works:
/// ```toml
/// show_rolls = true
/// gauss_limit = 50
///
/// [limits.operators]
/// pow = [100, 100]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prefix the reply with the expanded statement.
    pub show_statement: bool,

    /// Append the individual die values of small groups.
    pub show_rolls: bool,

    /// Groups with this many dice or more are not listed.
    pub show_rolls_limit: u64,

    /// Groups with this many dice or more are approximated.
    pub gauss_limit: u64,

    /// Longest allowed numeric result text.
    pub result_max_length: usize,

    /// Decimal places of the reply. Negative disables rounding.
    pub round_decimals: i32,

    /// Longest accepted pattern, in characters.
    pub pattern_max_length: usize,

    /// Evaluator bounds.
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_statement: false,
            show_rolls: false,
            show_rolls_limit: 20,
            gauss_limit: 100,
            result_max_length: 512,
            round_decimals: 2,
            pattern_max_length: 64,
            limits: Limits::default(),
        }
    }
}


/// Load a configuration file.
///
/// Returns `Ok(None)` if the file doesn't exist.
///
/// # Errors
///
/// Returns error if the file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<Config>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "DICE_CALC_CONFIG";

/// Load the configuration from `config_path` if given, else from the file
/// named by `$DICE_CALC_CONFIG`, else use the defaults.
///
/// # Errors
///
/// Returns error if the chosen file exists but has read or parse errors.
pub fn load_config_with_precedence(config_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let loaded = match config_path {
        Some(path) => load_config_file(path)?,
        None => match std::env::var(CONFIG_ENV) {
            Ok(env_path) => load_config_file(env_path)?,
            Err(_) => None,
        },
    };

    Ok(loaded.unwrap_or_default())
}

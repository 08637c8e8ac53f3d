//! Configuration management
//!
//! This module handles loading and validation of the host configuration.
//! Configuration is stored in TOML format at ~/.native-bridge/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **loader**: Library search directories and environment lookup
//! - **modules**: Native modules to load (defaults to the two shipped modules)
//!
//! # Examples
//!
//! ```no_run
//! use native_bridge::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_default()?;
//! println!("Log level: {}", config.core.log_level);
//! # Ok(())
//! # }
//! ```

use bridge_sdk::errors::BridgeError;
use bridge_sdk::manifest::{validate_modules, ModuleSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding extra library directories
pub const LIBRARY_PATH_ENV: &str = "NATIVE_BRIDGE_LIBRARY_PATH";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Core host settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Library search settings
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Native modules to load at startup
    #[serde(default = "ModuleSpec::defaults")]
    pub modules: Vec<ModuleSpec>,
}

/// Core host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Library search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directories searched after command-line and environment directories
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    /// Read extra directories from `NATIVE_BRIDGE_LIBRARY_PATH`
    #[serde(default = "default_true")]
    pub use_env_path: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            use_env_path: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            loader: LoaderConfig::default(),
            modules: ModuleSpec::defaults(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the default location (~/.native-bridge/config.toml)
    ///
    /// A missing file is not an error: the built-in defaults are returned and
    /// nothing is written to disk.
    pub fn load_or_default() -> Result<Self, BridgeError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            tracing::debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_from_path(path: &Path) -> Result<Self, BridgeError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| BridgeError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, BridgeError> {
        let mut config: Config = toml::from_str(contents)
            .map_err(|e| BridgeError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Serialize the effective configuration
    pub fn to_toml(&self) -> Result<String, BridgeError> {
        toml::to_string_pretty(self)
            .map_err(|e| BridgeError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Get the default configuration file path (~/.native-bridge/config.toml)
    pub fn default_config_path() -> Result<PathBuf, BridgeError> {
        let home = dirs::home_dir()
            .ok_or_else(|| BridgeError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".native-bridge").join("config.toml"))
    }

    /// Validate and process configuration
    ///
    /// This method:
    /// - Validates the log level
    /// - Validates the module table (names and symbols unique, symbol convention)
    /// - Expands ~ in search paths
    fn validate_and_process(&mut self) -> Result<(), BridgeError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(BridgeError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        validate_modules(&self.modules)?;

        self.loader.search_paths = self
            .loader
            .search_paths
            .iter()
            .map(|p| expand_tilde(p))
            .collect();

        Ok(())
    }
}

/// Expand a leading `~` to the user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

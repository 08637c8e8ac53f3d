//! Error types and handling
//!
//! This module provides the error types shared by the host and the native
//! module contract. All errors implement the `BridgeErrorExt` trait which
//! provides user-friendly hints and indicates whether errors are recoverable.
//!
//! Every variant is `Clone`: the loader caches the outcome of a module load
//! and hands the same error to every caller that asks for that module later.

use std::path::PathBuf;
use thiserror::Error;

/// Trait for bridge error extensions
pub trait BridgeErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is a static string and never echoes paths or native output.
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Loader errors describe a build or deployment problem that does not go
    /// away for the lifetime of the process, so none of them are.
    fn is_recoverable(&self) -> bool;
}

/// Main bridge error type
///
/// # Error Categories
///
/// - **Loading**: the library file is missing from the load path or is rejected
///   by the platform loader
/// - **Linking**: the library loaded but the conventional entry point is absent
///   or collides with another module's symbol
/// - **Calling**: a façade call was made without a valid bound handle
/// - **Configuration**: invalid or unreadable configuration
///
/// # Examples
///
/// ```
/// use bridge_sdk::errors::{BridgeError, BridgeErrorExt};
///
/// let error = BridgeError::NativeCall {
///     module: "greetings_cargo".to_string(),
///     reason: "module was never loaded".to_string(),
/// };
/// println!("Hint: {}", error.user_hint());
/// assert!(!error.is_recoverable());
///
/// let config_error = BridgeError::Config("bad log level".to_string());
/// assert!(config_error.is_recoverable());
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    // Library loading errors
    #[error("Module '{module}' not found on load path (searched {searched:?})")]
    ModuleNotFound {
        module: String,
        searched: Vec<PathBuf>,
    },

    #[error("Library load failed for module '{module}': {reason}")]
    LibraryLoad { module: String, reason: String },

    #[error("Symbol '{symbol}' could not be resolved for module '{module}': {reason}")]
    SymbolResolution {
        module: String,
        symbol: String,
        reason: String,
    },

    // Call errors
    #[error("Native call into module '{module}' failed: {reason}")]
    NativeCall { module: String, reason: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeErrorExt for BridgeError {
    fn user_hint(&self) -> &str {
        match self {
            Self::ModuleNotFound { .. } => {
                "Native library not found. Check --library-dir or NATIVE_BRIDGE_LIBRARY_PATH"
            }
            Self::LibraryLoad { .. } => "Native library is corrupt or built for another platform",
            Self::SymbolResolution { .. } => {
                "Native library does not export the expected entry point. Rebuild it"
            }
            Self::NativeCall { .. } => "Native module is not available in this process",
            Self::Config(_) => "Check your config.toml file for errors",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::ModuleNotFound { .. }
            | Self::LibraryLoad { .. }
            | Self::SymbolResolution { .. }
            | Self::NativeCall { .. } => false,

            Self::Config(_) => true,
        }
    }
}

//! Native module descriptors

use crate::abi::{Toolchain, SYMBOL_PREFIX};
use crate::errors::BridgeError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Logical name of the Cargo-built module
pub const CARGO_MODULE: &str = "greetings_cargo";

/// Logical name of the cc-built module
pub const CC_MODULE: &str = "greetings_cc";

/// Declaration of one native module the host may load
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Logical module name used by the loader and the façade
    pub name: String,
    pub toolchain: Toolchain,
    /// Library base name, without platform prefix or extension
    pub library: String,
    /// Exported entry point
    pub symbol: String,
}

impl ModuleSpec {
    /// Declare a module following the naming convention for `toolchain`
    pub fn conventional(name: &str, toolchain: Toolchain) -> Self {
        Self {
            name: name.to_string(),
            toolchain,
            library: name.to_string(),
            symbol: toolchain.symbol(),
        }
    }

    /// The two modules every host build ships with
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::conventional(CARGO_MODULE, Toolchain::Cargo),
            Self::conventional(CC_MODULE, Toolchain::Cc),
        ]
    }

    /// Check the entry point follows `greeting_from_<toolchain>`
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.name.is_empty() || self.library.is_empty() {
            return Err(BridgeError::Config(
                "module name and library must not be empty".to_string(),
            ));
        }
        if !self.symbol.starts_with(SYMBOL_PREFIX) || self.symbol.len() == SYMBOL_PREFIX.len() {
            return Err(BridgeError::Config(format!(
                "symbol '{}' of module '{}' must start with '{}'",
                self.symbol, self.name, SYMBOL_PREFIX
            )));
        }
        Ok(())
    }
}

/// Validate a module table: every entry well-formed, names and symbols unique
pub fn validate_modules(modules: &[ModuleSpec]) -> Result<(), BridgeError> {
    let mut names = HashSet::new();
    let mut symbols = HashSet::new();

    for module in modules {
        module.validate()?;
        if !names.insert(module.name.as_str()) {
            return Err(BridgeError::Config(format!(
                "module '{}' declared more than once",
                module.name
            )));
        }
        if !symbols.insert(module.symbol.as_str()) {
            return Err(BridgeError::Config(format!(
                "symbol '{}' exported by more than one module",
                module.symbol
            )));
        }
    }

    Ok(())
}

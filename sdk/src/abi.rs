//! C ABI contract between the host and the native modules
//!
//! Every native module exports exactly one entry point named
//! `greeting_from_<toolchain>`. The entry point takes no arguments and returns
//! a pointer to a static, NUL-terminated UTF-8 string owned by the library.
//! The host copies the string and never frees the pointer.

use serde::{Deserialize, Serialize};
use std::ffi::c_char;
use std::fmt;

/// Signature of a module entry point
pub type GreetingFn = unsafe extern "C" fn() -> *const c_char;

/// Prefix shared by all exported entry points
pub const SYMBOL_PREFIX: &str = "greeting_from_";

/// Build pipeline that produced a native module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Toolchain {
    /// Rust `cdylib` built by Cargo
    Cargo,
    /// C sources compiled through the `cc` crate
    Cc,
}

impl Toolchain {
    /// Identifier used in symbol names and config files
    pub fn id(self) -> &'static str {
        match self {
            Self::Cargo => "cargo",
            Self::Cc => "cc",
        }
    }

    /// Substring every greeting produced by this toolchain contains
    pub fn token(self) -> &'static str {
        match self {
            Self::Cargo => "Cargo",
            Self::Cc => "cc-rs",
        }
    }

    /// Conventional entry point name for this toolchain
    ///
    /// ```
    /// use bridge_sdk::abi::Toolchain;
    ///
    /// assert_eq!(Toolchain::Cargo.symbol(), "greeting_from_cargo");
    /// assert_eq!(Toolchain::Cc.symbol(), "greeting_from_cc");
    /// ```
    pub fn symbol(self) -> String {
        format!("{}{}", SYMBOL_PREFIX, self.id())
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// NUL-terminated form of a symbol name, as `dlsym` expects it
pub fn symbol_bytes(symbol: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(symbol.len() + 1);
    bytes.extend_from_slice(symbol.as_bytes());
    bytes.push(0);
    bytes
}

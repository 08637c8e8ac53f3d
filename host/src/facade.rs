//! Host façade
//!
//! `HostApp` is the one object callers use. It offers a purely local greeting
//! plus one method per native module, each delegating to the handle the
//! loader bound for that module.
//!
//! The loader must have finished loading before a façade is built: `new`
//! snapshots the handles, it never triggers a load. A module that failed to
//! load does not stop the façade from being built; only calls into that
//! module fail, with `BridgeError::NativeCall`.
//!
//! # Examples
//!
//! ```no_run
//! use native_bridge::config::Config;
//! use native_bridge::facade::HostApp;
//! use native_bridge::runtime::native;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = native::init(&Config::load_or_default()?, &[]);
//! let app = HostApp::new(loader);
//!
//! println!("{}", app.local_greeting());
//! println!("{}", app.greeting_from_cargo()?);
//! println!("{}", app.greeting_from_cc()?);
//! # Ok(())
//! # }
//! ```

use crate::runtime::{native, LoadResult, NativeLoader};
use bridge_sdk::{errors::BridgeError, CARGO_MODULE, CC_MODULE};

/// Greeting returned by [`HostApp::local_greeting`]
pub const LOCAL_GREETING: &str = "Hello World!";

/// Calling surface over the bound native handles
#[derive(Debug)]
pub struct HostApp {
    cargo: LoadResult,
    cc: LoadResult,
}

impl HostApp {
    /// Bind the façade to the modules `loader` has already loaded
    pub fn new(loader: &NativeLoader) -> Self {
        Self {
            cargo: loader.handle(CARGO_MODULE),
            cc: loader.handle(CC_MODULE),
        }
    }

    /// Bind the façade to the process-wide loader
    ///
    /// If `runtime::native::init` has not run, the façade is still built but
    /// both native calls fail.
    pub fn from_global() -> Self {
        match native::global() {
            Some(loader) => Self::new(loader),
            None => {
                tracing::warn!("Native loader not initialized, native greetings unavailable");
                Self::local()
            }
        }
    }

    /// A façade with no native modules at all
    pub fn local() -> Self {
        let unbound = |module: &str| BridgeError::NativeCall {
            module: module.to_string(),
            reason: "native loader not initialized".to_string(),
        };
        Self {
            cargo: Err(unbound(CARGO_MODULE)),
            cc: Err(unbound(CC_MODULE)),
        }
    }

    /// Fixed greeting with no native dependency
    pub fn local_greeting(&self) -> &'static str {
        LOCAL_GREETING
    }

    /// Greeting from the module built by Cargo
    pub fn greeting_from_cargo(&self) -> Result<String, BridgeError> {
        Self::call(&self.cargo)
    }

    /// Greeting from the module built from C sources by `cc`
    pub fn greeting_from_cc(&self) -> Result<String, BridgeError> {
        Self::call(&self.cc)
    }

    fn call(handle: &LoadResult) -> Result<String, BridgeError> {
        match handle {
            Ok(handle) => handle.call(),
            Err(e) => {
                tracing::error!("Native call rejected: {}", e);
                Err(e.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_greeting_without_loader() {
        let app = HostApp::local();
        assert_eq!(app.local_greeting(), "Hello World!");
    }

    #[test]
    fn test_native_calls_fail_without_loader() {
        let app = HostApp::local();

        let err = app.greeting_from_cargo().unwrap_err();
        assert!(matches!(err, BridgeError::NativeCall { ref module, .. } if module == CARGO_MODULE));

        let err = app.greeting_from_cc().unwrap_err();
        assert!(matches!(err, BridgeError::NativeCall { ref module, .. } if module == CC_MODULE));
    }
}

//! Native Bridge SDK
//!
//! Shared types for the host and the native modules: the error taxonomy,
//! the C ABI contract and module descriptors.

/// C ABI contract of module entry points
pub mod abi;

/// Error types and handling
pub mod errors;

/// Native module descriptors
pub mod manifest;

// Re-export commonly used types
pub use abi::{GreetingFn, Toolchain};
pub use errors::{BridgeError, BridgeErrorExt};
pub use manifest::{ModuleSpec, CARGO_MODULE, CC_MODULE};

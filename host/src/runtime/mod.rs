//! Runtime module for loading native modules
//!
//! - `load_path`: where library files are looked up
//! - `native`: the loader, its backends and the process-wide registry

pub mod load_path;
pub mod native;

pub use load_path::LoadPath;
pub use native::{BoundHandle, DylibBackend, LoadResult, ModuleBackend, NativeLoader};

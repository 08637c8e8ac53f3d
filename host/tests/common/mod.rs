//! Shared helpers for the integration tests

#![allow(dead_code)]

use bridge_sdk::abi::Toolchain;
use bridge_sdk::errors::BridgeError;
use bridge_sdk::manifest::ModuleSpec;
use native_bridge::platform::library_filename;
use native_bridge::runtime::{BoundHandle, LoadPath, ModuleBackend};
use std::ffi::c_char;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Directories where Cargo leaves the workspace's shared libraries
///
/// `NATIVE_BRIDGE_LIBRARY_PATH` comes first when set; after it the profile
/// directory and its `deps/` directory next to the running test binary.
pub fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(value) = std::env::var_os("NATIVE_BRIDGE_LIBRARY_PATH") {
        dirs.extend(std::env::split_paths(&value));
    }
    if let Ok(exe) = std::env::current_exe() {
        // target/<profile>/deps/<test binary>
        if let Some(deps) = exe.parent() {
            dirs.push(deps.to_path_buf());
            if let Some(profile) = deps.parent() {
                dirs.push(profile.to_path_buf());
            }
        }
    }
    dirs
}

/// Load path holding both greeting libraries, or `None` if they are not built
pub fn built_load_path() -> Option<LoadPath> {
    let path = LoadPath::new(candidate_dirs());
    let complete = ModuleSpec::defaults()
        .iter()
        .all(|spec| path.resolve(&spec.library).is_some());

    if complete {
        Some(path)
    } else {
        eprintln!(
            "skipping: greeting libraries not found in {:?}; build the workspace first",
            path.dirs()
        );
        None
    }
}

/// Temporary directory with empty placeholder files for `libraries`
pub fn placeholder_dir(libraries: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    for library in libraries {
        fs::write(dir.path().join(library_filename(library)), b"")
            .expect("Failed to write placeholder library");
    }
    dir
}

/// Copy one built library into `dest`
pub fn copy_library(from: &LoadPath, library: &str, dest: &Path) {
    let source = from.resolve(library).expect("library resolved earlier");
    fs::copy(&source, dest.join(library_filename(library))).expect("Failed to copy library");
}

pub extern "C" fn fake_cargo_greeting() -> *const c_char {
    c"Hello from a fake Cargo module".as_ptr()
}

pub extern "C" fn fake_cc_greeting() -> *const c_char {
    c"Hello from a fake cc-rs module".as_ptr()
}

/// Loader backend double that counts opens per module and can stall them
#[derive(Default)]
pub struct CountingBackend {
    pub opens: Arc<Mutex<Vec<String>>>,
    pub total: Arc<AtomicUsize>,
    pub delay: Duration,
}

impl CountingBackend {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn handles(&self) -> (Arc<Mutex<Vec<String>>>, Arc<AtomicUsize>) {
        (Arc::clone(&self.opens), Arc::clone(&self.total))
    }
}

impl ModuleBackend for CountingBackend {
    fn open(&self, module: &ModuleSpec, path: &Path) -> Result<BoundHandle, BridgeError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        self.opens
            .lock()
            .expect("opens lock poisoned")
            .push(module.name.clone());

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let entry = match module.toolchain {
            Toolchain::Cargo => fake_cargo_greeting,
            Toolchain::Cc => fake_cc_greeting,
        };
        Ok(BoundHandle::in_process(
            module.clone(),
            path.to_path_buf(),
            entry,
        ))
    }
}

/// Count how many times `name` was opened
pub fn opens_of(opens: &Mutex<Vec<String>>, name: &str) -> usize {
    opens
        .lock()
        .expect("opens lock poisoned")
        .iter()
        .filter(|n| n.as_str() == name)
        .count()
}

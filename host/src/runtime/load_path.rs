//! Library search path
//!
//! Directories are searched in this order:
//!
//! 1. directories passed on the command line (`--library-dir`)
//! 2. `NATIVE_BRIDGE_LIBRARY_PATH`, when enabled in the config
//! 3. `loader.search_paths` from the config file
//! 4. the directory of the running executable
//!
//! The path is fixed once the loader is built.

use crate::config::{LoaderConfig, LIBRARY_PATH_ENV};
use crate::platform::{executable_dir, library_filename};
use std::path::{Path, PathBuf};

/// Ordered, de-duplicated list of library directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadPath {
    dirs: Vec<PathBuf>,
}

impl LoadPath {
    /// Build a load path from explicit directories, keeping first occurrences
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut path = Self::default();
        for dir in dirs {
            path.push(dir.into());
        }
        path
    }

    /// Build the process load path from config and command-line directories
    pub fn from_config(loader: &LoaderConfig, cli_dirs: &[PathBuf]) -> Self {
        let mut path = Self::new(cli_dirs.iter().cloned());

        if loader.use_env_path {
            if let Some(value) = std::env::var_os(LIBRARY_PATH_ENV) {
                for dir in std::env::split_paths(&value) {
                    if !dir.as_os_str().is_empty() {
                        path.push(dir);
                    }
                }
            }
        }

        for dir in &loader.search_paths {
            path.push(dir.clone());
        }

        if let Some(dir) = executable_dir() {
            path.push(dir);
        }

        tracing::debug!("Library load path: {:?}", path.dirs);
        path
    }

    fn push(&mut self, dir: PathBuf) {
        if !self.dirs.contains(&dir) {
            self.dirs.push(dir);
        }
    }

    /// Directories in search order
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Find the library file for `library` in the first directory holding it
    pub fn resolve(&self, library: &str) -> Option<PathBuf> {
        let filename = library_filename(library);
        self.dirs
            .iter()
            .map(|dir| dir.join(&filename))
            .find(|candidate| is_file(candidate))
    }
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

//! Native loader for the greeting modules
//!
//! This module implements the `NativeLoader`, which finds each declared
//! module's shared library on the load path (.so/.dylib/.dll), opens it and
//! binds the module's exported entry point to a [`BoundHandle`].
//!
//! # Loading Rules
//!
//! - Every logical module name is loaded at most once per loader. The first
//!   caller performs the load; concurrent callers for the same name block until
//!   it finishes and then share its result (single-flight).
//! - The outcome is cached, failures included. The load path does not change
//!   for the lifetime of the process, so a failed load is never retried.
//! - An exported symbol may be bound by one logical module only. A second
//!   module claiming an already bound symbol fails with `SymbolResolution`.
//! - Modules do not depend on each other. Load order does not matter and one
//!   module failing to load leaves the others untouched.
//!
//! # Examples
//!
//! ```no_run
//! use native_bridge::config::Config;
//! use native_bridge::runtime::NativeLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_default()?;
//! let loader = NativeLoader::from_config(&config, &[]);
//!
//! let handle = loader.load_module("greetings_cargo")?;
//! println!("{}", handle.call()?);
//! # Ok(())
//! # }
//! ```

use super::load_path::LoadPath;
use crate::config::Config;
use bridge_sdk::{
    abi::{symbol_bytes, GreetingFn},
    errors::BridgeError,
    manifest::ModuleSpec,
};
use std::collections::HashMap;
use std::ffi::{c_char, CStr};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Outcome of loading one module, shared by every caller that asks for it
pub type LoadResult = Result<Arc<BoundHandle>, BridgeError>;

/// A module's entry point, resolved and ready to call
///
/// Handles are created once at load time and never change afterwards. A
/// handle produced from a shared library owns that library, so the entry
/// point stays mapped for as long as the handle is alive.
pub struct BoundHandle {
    module: ModuleSpec,
    path: PathBuf,
    entry: GreetingFn,
    _library: Option<libloading::Library>,
}

impl BoundHandle {
    /// Bind an entry point that lives in this process instead of a library
    ///
    /// Used by backends that do not go through `dlopen`, such as test doubles.
    pub fn in_process(
        module: ModuleSpec,
        path: PathBuf,
        entry: extern "C" fn() -> *const c_char,
    ) -> Self {
        Self {
            module,
            path,
            entry,
            _library: None,
        }
    }

    /// Module this handle was bound for
    pub fn module(&self) -> &ModuleSpec {
        &self.module
    }

    /// Library file the entry point was resolved from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Call the entry point and copy out the string it returns
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::NativeCall` if the entry point returns a null
    /// pointer. Invalid UTF-8 is replaced rather than rejected.
    pub fn call(&self) -> Result<String, BridgeError> {
        tracing::debug!("Calling '{}' in '{}'", self.module.symbol, self.module.name);

        // SAFETY: `entry` either points into `_library`, which this handle keeps
        // loaded, or is a safe in-process function. Both follow the module ABI.
        let ptr = unsafe { (self.entry)() };
        if ptr.is_null() {
            tracing::error!("'{}' returned a null pointer", self.module.symbol);
            return Err(BridgeError::NativeCall {
                module: self.module.name.clone(),
                reason: format!("'{}' returned a null pointer", self.module.symbol),
            });
        }

        // SAFETY: the ABI guarantees a NUL-terminated string in static storage.
        let text = unsafe { CStr::from_ptr(ptr) };
        Ok(text.to_string_lossy().into_owned())
    }
}

impl std::fmt::Debug for BoundHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundHandle")
            .field("module", &self.module.name)
            .field("symbol", &self.module.symbol)
            .field("path", &self.path)
            .finish()
    }
}

/// Opens a resolved library file and binds the module's entry point
pub trait ModuleBackend: Send + Sync {
    /// Open `path` and resolve `module.symbol` in it
    fn open(&self, module: &ModuleSpec, path: &Path) -> Result<BoundHandle, BridgeError>;
}

/// Backend that loads shared libraries with `libloading`
#[derive(Debug, Default, Clone, Copy)]
pub struct DylibBackend;

impl ModuleBackend for DylibBackend {
    fn open(&self, module: &ModuleSpec, path: &Path) -> Result<BoundHandle, BridgeError> {
        // SAFETY: loading runs the library's initialisers. The modules are built
        // from this workspace and have none beyond the platform defaults.
        let library = unsafe { libloading::Library::new(path) }.map_err(|e| {
            tracing::error!("Failed to load library {}: {}", path.display(), e);
            BridgeError::LibraryLoad {
                module: module.name.clone(),
                reason: e.to_string(),
            }
        })?;

        let entry: GreetingFn = {
            // SAFETY: the symbol type is the module ABI every module exports.
            let symbol: libloading::Symbol<GreetingFn> =
                unsafe { library.get(&symbol_bytes(&module.symbol)) }.map_err(|e| {
                    tracing::error!(
                        "Symbol '{}' not found in {}: {}",
                        module.symbol,
                        path.display(),
                        e
                    );
                    BridgeError::SymbolResolution {
                        module: module.name.clone(),
                        symbol: module.symbol.clone(),
                        reason: e.to_string(),
                    }
                })?;
            *symbol
        };

        Ok(BoundHandle {
            module: module.clone(),
            path: path.to_path_buf(),
            entry,
            _library: Some(library),
        })
    }
}

/// Loads declared native modules and keeps their bound handles
///
/// # Thread Safety
///
/// The loader is `Sync`. Every declared module gets its own `OnceLock` slot
/// when the loader is built and the slot map is never modified afterwards,
/// so finding a slot takes no lock. The load itself runs inside the slot's
/// `OnceLock`: distinct modules load in parallel and lookups after loading
/// never block.
pub struct NativeLoader {
    /// Modules this loader may load, by declaration order
    modules: Vec<ModuleSpec>,
    load_path: LoadPath,
    backend: Box<dyn ModuleBackend>,
    /// One slot per declared logical name
    slots: HashMap<String, OnceLock<LoadResult>>,
    /// Exported symbol -> logical name that bound it
    symbols: Mutex<HashMap<String, String>>,
}

impl NativeLoader {
    /// Create a loader that opens real shared libraries
    pub fn new(modules: Vec<ModuleSpec>, load_path: LoadPath) -> Self {
        Self::with_backend(modules, load_path, DylibBackend)
    }

    /// Create a loader with a custom backend
    pub fn with_backend<B>(modules: Vec<ModuleSpec>, load_path: LoadPath, backend: B) -> Self
    where
        B: ModuleBackend + 'static,
    {
        tracing::info!("Initializing NativeLoader with {} module(s)", modules.len());
        let slots = modules
            .iter()
            .map(|m| (m.name.clone(), OnceLock::new()))
            .collect();
        Self {
            modules,
            load_path,
            backend: Box::new(backend),
            slots,
            symbols: Mutex::new(HashMap::new()),
        }
    }

    /// Create a loader from configuration plus command-line library directories
    pub fn from_config(config: &Config, cli_dirs: &[PathBuf]) -> Self {
        Self::new(
            config.modules.clone(),
            LoadPath::from_config(&config.loader, cli_dirs),
        )
    }

    /// Declared modules
    pub fn modules(&self) -> &[ModuleSpec] {
        &self.modules
    }

    /// Directories searched for libraries
    pub fn load_path(&self) -> &LoadPath {
        &self.load_path
    }

    /// Load a module by logical name and return its bound handle
    ///
    /// Calling this again for the same name returns the cached result without
    /// touching the backend.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::ModuleNotFound` if the name is not declared or its
    /// library is on none of the load path directories.
    /// Returns `BridgeError::LibraryLoad` if the platform loader rejects the file.
    /// Returns `BridgeError::SymbolResolution` if the entry point is missing or
    /// already bound by another module.
    pub fn load_module(&self, name: &str) -> LoadResult {
        let (spec, slot) = self
            .spec(name)
            .zip(self.slots.get(name))
            .ok_or_else(|| {
                tracing::error!("Module '{}' is not declared", name);
                self.not_found(name)
            })?;

        slot.get_or_init(|| self.open(spec)).clone()
    }

    /// Load every declared module, independently of each other
    pub fn load_all(&self) -> Vec<(String, LoadResult)> {
        self.modules
            .iter()
            .map(|m| (m.name.clone(), self.load_module(&m.name)))
            .collect()
    }

    /// Look up the handle of a module that has already been loaded
    ///
    /// This never starts a load.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::NativeCall` if the module was never loaded or its
    /// load failed; the reason carries the original load error.
    pub fn handle(&self, name: &str) -> LoadResult {
        match self.slots.get(name).and_then(OnceLock::get) {
            Some(Ok(handle)) => Ok(Arc::clone(handle)),
            Some(Err(e)) => Err(BridgeError::NativeCall {
                module: name.to_string(),
                reason: e.to_string(),
            }),
            None => {
                tracing::debug!("Module '{}' requested before loading", name);
                Err(BridgeError::NativeCall {
                    module: name.to_string(),
                    reason: "module has not been loaded".to_string(),
                })
            }
        }
    }

    /// Names of all successfully bound modules, sorted
    pub fn loaded_modules(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot.get(), Some(Ok(_))))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    fn spec(&self, name: &str) -> Option<&ModuleSpec> {
        self.modules.iter().find(|m| m.name == name)
    }

    fn not_found(&self, name: &str) -> BridgeError {
        BridgeError::ModuleNotFound {
            module: name.to_string(),
            searched: self.load_path.dirs().to_vec(),
        }
    }

    /// Fail if another module already bound `spec.symbol`; record `spec` as
    /// its owner when `claim` is set
    fn check_symbol(&self, spec: &ModuleSpec, claim: bool) -> Result<(), BridgeError> {
        let mut symbols = self.symbols.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(owner) = symbols.get(&spec.symbol).filter(|owner| *owner != &spec.name) {
            tracing::error!(
                "Symbol '{}' of '{}' is already bound by '{}'",
                spec.symbol,
                spec.name,
                owner
            );
            return Err(BridgeError::SymbolResolution {
                module: spec.name.clone(),
                symbol: spec.symbol.clone(),
                reason: format!("already bound by module '{}'", owner),
            });
        }

        if claim {
            symbols.insert(spec.symbol.clone(), spec.name.clone());
        }
        Ok(())
    }

    fn open(&self, spec: &ModuleSpec) -> LoadResult {
        tracing::info!(
            "Loading native module '{}' (toolchain: {})",
            spec.name,
            spec.toolchain
        );

        // Skip opening a library whose symbol is already taken
        self.check_symbol(spec, false)?;

        let path = self.load_path.resolve(&spec.library).ok_or_else(|| {
            tracing::error!(
                "Library for '{}' not found in {:?}",
                spec.name,
                self.load_path.dirs()
            );
            self.not_found(&spec.name)
        })?;

        let handle = self.backend.open(spec, &path)?;

        // Only a module that actually bound its entry point owns the symbol
        self.check_symbol(spec, true)?;

        tracing::info!(
            "Native module '{}' bound '{}' from {}",
            spec.name,
            spec.symbol,
            path.display()
        );
        Ok(Arc::new(handle))
    }
}

static GLOBAL: OnceLock<NativeLoader> = OnceLock::new();

/// Initialize the process-wide loader and load every declared module
///
/// Only the first call builds the loader; later calls return the same one and
/// ignore their arguments. Module load failures are logged and remembered in
/// the loader, where the façade picks them up.
pub fn init(config: &Config, cli_dirs: &[PathBuf]) -> &'static NativeLoader {
    GLOBAL.get_or_init(|| {
        let loader = NativeLoader::from_config(config, cli_dirs);
        for (name, result) in loader.load_all() {
            if let Err(e) = result {
                tracing::warn!("Native module '{}' unavailable: {}", name, e);
            }
        }
        loader
    })
}

/// The process-wide loader, if `init` has run
pub fn global() -> Option<&'static NativeLoader> {
    GLOBAL.get()
}

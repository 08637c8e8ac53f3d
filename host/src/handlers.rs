//! Command handlers for CLI operations
//!
//! - greet: call the local greeting and both native greetings
//! - modules: show every declared module and how its load went
//! - config show / config path

use anyhow::{bail, Context, Result};
use bridge_sdk::{abi::Toolchain, errors::BridgeErrorExt, CARGO_MODULE, CC_MODULE};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

use crate::config::Config;
use crate::facade::HostApp;
use crate::platform::platform_name;
use crate::runtime::NativeLoader;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Result of calling one native greeting
#[derive(Debug, Clone, Serialize)]
pub struct NativeGreeting {
    pub module: String,
    pub toolchain: Toolchain,
    pub greeting: Option<String>,
    pub error: Option<String>,
    pub hint: Option<String>,
}

/// Everything `greet` reports
#[derive(Debug, Clone, Serialize)]
pub struct GreetingReport {
    pub local: String,
    pub native: Vec<NativeGreeting>,
}

impl GreetingReport {
    /// Call every façade method once
    pub fn collect(app: &HostApp) -> Self {
        let native = [
            (CARGO_MODULE, Toolchain::Cargo, app.greeting_from_cargo()),
            (CC_MODULE, Toolchain::Cc, app.greeting_from_cc()),
        ]
        .into_iter()
        .map(|(module, toolchain, result)| match result {
            Ok(greeting) => NativeGreeting {
                module: module.to_string(),
                toolchain,
                greeting: Some(greeting),
                error: None,
                hint: None,
            },
            Err(e) => NativeGreeting {
                module: module.to_string(),
                toolchain,
                greeting: None,
                error: Some(e.to_string()),
                hint: Some(e.user_hint().to_string()),
            },
        })
        .collect();

        Self {
            local: app.local_greeting().to_string(),
            native,
        }
    }

    /// Names of modules whose greeting failed
    pub fn failed(&self) -> Vec<&str> {
        self.native
            .iter()
            .filter(|g| g.error.is_some())
            .map(|g| g.module.as_str())
            .collect()
    }
}

/// Call all greetings and print them
///
/// Fails after printing if any native greeting failed.
pub fn handle_greet(app: &HostApp, format: OutputFormat) -> Result<()> {
    let report = GreetingReport::collect(app);

    match format {
        OutputFormat::Text => {
            println!("local: {}", report.local);
            for greeting in &report.native {
                match (&greeting.greeting, &greeting.error) {
                    (Some(text), _) => println!("{} ({}): {}", greeting.module, greeting.toolchain, text),
                    (None, Some(error)) => {
                        println!("{} ({}): ERROR {}", greeting.module, greeting.toolchain, error);
                        if let Some(hint) = &greeting.hint {
                            println!("  hint: {}", hint);
                        }
                    }
                    (None, None) => {}
                }
            }
        }
        OutputFormat::Json => {
            let output =
                serde_json::to_string_pretty(&report).context("Failed to serialize greetings")?;
            println!("{}", output);
        }
    }

    let failed = report.failed();
    if !failed.is_empty() {
        bail!("native greeting failed for: {}", failed.join(", "));
    }
    Ok(())
}

/// Load status of one declared module
#[derive(Debug, Clone, Serialize)]
pub struct ModuleStatus {
    pub name: String,
    pub toolchain: Toolchain,
    pub library: String,
    pub symbol: String,
    pub loaded: bool,
    pub path: Option<PathBuf>,
    pub error: Option<String>,
}

/// Look up every declared module once
pub fn module_statuses(loader: &NativeLoader) -> Vec<ModuleStatus> {
    loader
        .modules()
        .iter()
        .map(|spec| {
            let (path, error) = match loader.handle(&spec.name) {
                Ok(handle) => (Some(handle.path().to_path_buf()), None),
                Err(e) => (None, Some(e.to_string())),
            };
            ModuleStatus {
                name: spec.name.clone(),
                toolchain: spec.toolchain,
                library: spec.library.clone(),
                symbol: spec.symbol.clone(),
                loaded: path.is_some(),
                path,
                error,
            }
        })
        .collect()
}

/// Show declared modules, where their libraries resolve and their load status
pub fn handle_modules(loader: &NativeLoader, format: OutputFormat) -> Result<()> {
    let statuses = module_statuses(loader);

    match format {
        OutputFormat::Text => {
            println!("Native Modules:");
            println!();
            for status in &statuses {
                let state = match (&status.path, &status.error) {
                    (Some(path), _) => format!("loaded from {}", path.display()),
                    (None, Some(error)) => format!("unavailable ({})", error),
                    (None, None) => "unavailable".to_string(),
                };
                println!(
                    "  {} [{}] {}: {}",
                    status.name, status.toolchain, status.symbol, state
                );
            }
            println!();
            println!("Search path:");
            for dir in loader.load_path().dirs() {
                println!("  {}", dir.display());
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "platform": platform_name(),
                "modules": statuses,
                "search_path": loader.load_path().dirs(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Print the effective configuration
pub fn handle_config_show(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", config.to_toml()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}

/// Print the default configuration file path
pub fn handle_config_path() -> Result<()> {
    println!("{}", Config::default_config_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_without_native_modules() {
        let report = GreetingReport::collect(&HostApp::local());

        assert_eq!(report.local, "Hello World!");
        assert_eq!(report.failed(), vec![CARGO_MODULE, CC_MODULE]);
        assert!(report.native.iter().all(|g| g.hint.is_some()));
    }

    #[test]
    fn test_report_serializes_toolchain_ids() {
        let report = GreetingReport::collect(&HostApp::local());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["native"][0]["toolchain"], "cargo");
        assert_eq!(value["native"][1]["toolchain"], "cc");
        assert!(value["native"][0]["greeting"].is_null());
    }

    #[test]
    fn test_module_statuses_reflect_loads() {
        use crate::runtime::{BoundHandle, LoadPath, ModuleBackend};
        use bridge_sdk::{errors::BridgeError, manifest::ModuleSpec};
        use std::ffi::c_char;
        use std::path::Path;

        extern "C" fn greeting() -> *const c_char {
            c"Hello from Cargo in-process".as_ptr()
        }

        struct InProcess;
        impl ModuleBackend for InProcess {
            fn open(&self, module: &ModuleSpec, path: &Path) -> Result<BoundHandle, BridgeError> {
                Ok(BoundHandle::in_process(module.clone(), path.to_path_buf(), greeting))
            }
        }

        let dir = tempfile::TempDir::new().unwrap();
        let file = crate::platform::library_filename(CARGO_MODULE);
        std::fs::write(dir.path().join(&file), b"").unwrap();
        let loader =
            NativeLoader::with_backend(ModuleSpec::defaults(), LoadPath::new([dir.path()]), InProcess);
        loader.load_all();

        let statuses = module_statuses(&loader);
        assert_eq!(statuses.len(), 2);
        assert!(statuses[0].loaded);
        assert_eq!(statuses[0].path, Some(dir.path().join(&file)));
        assert!(statuses[0].error.is_none());
        assert!(!statuses[1].loaded);
        assert!(statuses[1].error.as_deref().unwrap().contains(CC_MODULE));
    }

    #[test]
    fn test_greet_fails_when_native_missing() {
        let err = handle_greet(&HostApp::local(), OutputFormat::Json).unwrap_err();
        assert!(err.to_string().contains(CARGO_MODULE));
    }
}

//! Platform-specific utilities
//!
//! Shared libraries are named differently on every platform. The loader only
//! knows a module's library base name and turns it into a file name here.

use std::path::{Path, PathBuf};

/// Get the platform name as a string
///
/// Returns one of: "linux", "macos", "windows", "unknown"
///
/// # Examples
///
/// ```
/// use native_bridge::platform::platform_name;
///
/// let name = platform_name();
/// assert!(["linux", "macos", "windows", "unknown"].contains(&name));
/// ```
pub fn platform_name() -> &'static str {
    #[cfg(target_os = "linux")]
    return "linux";

    #[cfg(target_os = "macos")]
    return "macos";

    #[cfg(target_os = "windows")]
    return "windows";

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return "unknown";
}

/// Get the platform-specific shared library extension
///
/// - Linux: "so"
/// - macOS: "dylib"
/// - Windows: "dll"
pub fn library_extension() -> &'static str {
    #[cfg(target_os = "linux")]
    return "so";

    #[cfg(target_os = "macos")]
    return "dylib";

    #[cfg(target_os = "windows")]
    return "dll";

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return "so"; // Default to .so for unknown platforms
}

/// Get the platform-specific shared library prefix
///
/// - Unix (Linux, macOS): "lib"
/// - Windows: "" (no prefix)
pub fn library_prefix() -> &'static str {
    #[cfg(unix)]
    return "lib";

    #[cfg(not(unix))]
    return "";
}

/// Construct a platform-specific library filename
///
/// Given a library base name, constructs the full filename with the
/// appropriate prefix and extension for the current platform. Cargo builds a
/// `cdylib` named `greetings-cargo` into `libgreetings_cargo.so`, so the base
/// name here is always the underscore form.
///
/// # Examples
///
/// ```
/// use native_bridge::platform::library_filename;
///
/// let filename = library_filename("greetings_cc");
///
/// #[cfg(target_os = "linux")]
/// assert_eq!(filename, "libgreetings_cc.so");
///
/// #[cfg(target_os = "macos")]
/// assert_eq!(filename, "libgreetings_cc.dylib");
///
/// #[cfg(target_os = "windows")]
/// assert_eq!(filename, "greetings_cc.dll");
/// ```
pub fn library_filename(name: &str) -> String {
    format!("{}{}.{}", library_prefix(), name, library_extension())
}

/// Directory containing the running executable, if it can be determined
pub fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

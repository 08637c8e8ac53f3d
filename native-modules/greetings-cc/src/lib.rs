//! Greeting module whose text is produced by C code
//!
//! The C translation unit in `csrc/` is compiled by the `cc` crate at build
//! time. This crate re-exports it under the conventional `greeting_from_cc`
//! entry point.
//!
//! There is no second build pipeline: `cc` is driven by Cargo's build script
//! (`build.rs`) and rustc still links the final shared library. Only the
//! greeting's translation unit goes through the platform C compiler.

use std::ffi::c_char;

extern "C" {
    fn cc_greeting() -> *const c_char;
}

/// Return the module greeting
///
/// The returned pointer refers to a static C array and must not be freed.
#[no_mangle]
pub extern "C" fn greeting_from_cc() -> *const c_char {
    // SAFETY: cc_greeting takes no arguments and returns static storage.
    unsafe { cc_greeting() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_greeting_mentions_cc() {
        let ptr = greeting_from_cc();
        assert!(!ptr.is_null());
        let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap();
        assert_eq!(text, "Hello from C compiled by cc-rs!");
        assert!(text.contains("cc-rs"));
    }

    #[test]
    fn test_wrapper_returns_c_storage() {
        // SAFETY: cc_greeting comes from the archive compiled by build.rs.
        let from_c = unsafe { cc_greeting() };
        assert_eq!(greeting_from_cc(), from_c);
    }
}

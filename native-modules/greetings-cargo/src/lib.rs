//! Greeting module built by Cargo
//!
//! Exports `greeting_from_cargo` for the host's native loader.

use std::ffi::{c_char, CStr};
use std::io::Write;

static GREETING: &CStr = c"Hello from Cargo cdylib!";

/// Return the module greeting
///
/// The returned pointer refers to static data and must not be freed.
#[no_mangle]
pub extern "C" fn greeting_from_cargo() -> *const c_char {
    // Tagged echo so both toolchains can be told apart in a combined log
    let greeting = GREETING.to_string_lossy();
    let _ = writeln!(std::io::stdout(), "[Cargo] {}", greeting);
    GREETING.as_ptr()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_mentions_cargo() {
        let ptr = greeting_from_cargo();
        assert!(!ptr.is_null());
        let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap();
        assert!(text.contains("Cargo"));
    }

    #[test]
    fn test_greeting_is_stable() {
        assert_eq!(greeting_from_cargo(), greeting_from_cargo());
    }
}

mod common;

use bridge_sdk::manifest::ModuleSpec;
use bridge_sdk::{CARGO_MODULE, CC_MODULE};
use common::{opens_of, placeholder_dir, CountingBackend};
use native_bridge::platform::library_filename;
use native_bridge::runtime::{LoadPath, NativeLoader};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Load(&'static str),
    Lookup(&'static str),
}

fn op() -> impl Strategy<Value = Op> {
    let name = prop_oneof![Just(CARGO_MODULE), Just(CC_MODULE), Just("greetings_gradle")];
    (any::<bool>(), name).prop_map(|(load, name)| if load { Op::Load(name) } else { Op::Lookup(name) })
}

// Any interleaving of loads and lookups opens each present library at most
// once, and every successful load of a name yields the same handle.
proptest! {
    #[test]
    fn test_load_module_idempotent(ops in prop::collection::vec(op(), 1..40), cc_present in any::<bool>()) {
        let present: Vec<&str> = if cc_present { vec![CARGO_MODULE, CC_MODULE] } else { vec![CARGO_MODULE] };
        let dir = placeholder_dir(&present);
        let backend = CountingBackend::default();
        let (opens, total) = backend.handles();
        let loader = NativeLoader::with_backend(ModuleSpec::defaults(), LoadPath::new([dir.path()]), backend);

        let mut requested = HashSet::new();
        let mut first_handles = std::collections::HashMap::new();

        for op in ops {
            match op {
                Op::Load(name) => {
                    requested.insert(name);
                    match loader.load_module(name) {
                        Ok(handle) => {
                            let first = first_handles.entry(name).or_insert_with(|| Arc::clone(&handle));
                            prop_assert!(Arc::ptr_eq(first, &handle));
                        }
                        Err(_) => prop_assert!(!present.contains(&name)),
                    }
                }
                Op::Lookup(name) => {
                    let loaded = requested.contains(name) && present.contains(&name);
                    prop_assert_eq!(loader.handle(name).is_ok(), loaded);
                }
            }
        }

        let expected = requested.iter().filter(|n| present.contains(*n)).count();
        prop_assert_eq!(total.load(Ordering::SeqCst), expected);
        for name in present {
            prop_assert!(opens_of(&opens, name) <= 1);
        }
    }

    #[test]
    fn test_library_filename_wraps_base_name(name in "[a-z][a-z0-9_]{0,24}") {
        let filename = library_filename(&name);
        prop_assert!(filename.contains(name.as_str()));
        prop_assert!(filename.ends_with(native_bridge::platform::library_extension()));
        prop_assert!(filename.starts_with(native_bridge::platform::library_prefix()));
    }
}

//! Process-wide registry of nominal `Equal` capabilities.
//!
//! A type that defines its own equality registers it once, keyed by type
//! name; `equal_deep` consults the registry before descending into records
//! and opaque values. Lookups vastly outnumber registrations, so the map sits
//! behind a read-write lock.

use std::any::Any;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::value::Value;

/// Binary equality over two values of the same nominal type.
pub type EqualFn = fn(&Value, &Value) -> bool;

static REGISTRY: LazyLock<RwLock<FxHashMap<Arc<str>, EqualFn>>> =
    LazyLock::new(|| RwLock::new(FxHashMap::default()));

/// Register (or replace) the `Equal` capability of `type_name`.
pub fn register_equal(type_name: &str, equal: EqualFn) {
    let mut registry = REGISTRY.write();
    if registry.insert(Arc::from(type_name), equal).is_none() {
        tracing::trace!(type_name, "registered Equal capability");
    }
}

/// Register `T`'s `PartialEq` as the capability of opaque values wrapping `T`.
pub fn register_opaque_equal<T: PartialEq + Any>() {
    register_equal(std::any::type_name::<T>(), opaque_eq::<T>);
}

fn opaque_eq<T: PartialEq + Any>(a: &Value, b: &Value) -> bool {
    let a = a.as_opaque().and_then(|o| o.downcast_ref::<T>());
    let b = b.as_opaque().and_then(|o| o.downcast_ref::<T>());
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// The capability registered for `type_name`, if any.
pub fn equal_capability(type_name: &str) -> Option<EqualFn> {
    REGISTRY.read().get(type_name).copied()
}

/// Whether `type_name` has a registered capability.
pub fn has_equal(type_name: &str) -> bool {
    REGISTRY.read().contains_key(type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Celsius(i32);

    fn always(_: &Value, _: &Value) -> bool {
        true
    }

    #[test]
    fn registered_capability_is_found() {
        register_equal("capability_tests::Always", always);
        assert!(has_equal("capability_tests::Always"));
        assert!(equal_capability("capability_tests::Always").is_some());
        assert!(equal_capability("capability_tests::Unknown").is_none());
    }

    #[test]
    fn opaque_capability_uses_partial_eq() {
        register_opaque_equal::<Celsius>();
        let eq = equal_capability(std::any::type_name::<Celsius>());
        let Some(eq) = eq else {
            panic!("capability missing");
        };
        assert!(eq(&Value::opaque(Celsius(3)), &Value::opaque(Celsius(3))));
        assert!(!eq(&Value::opaque(Celsius(3)), &Value::opaque(Celsius(4))));
    }
}

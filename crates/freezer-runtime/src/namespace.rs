use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::{Map, Value};

/// A module's exported bindings.
///
/// Clones share the same bindings, so a dependent holding a namespace sees
/// every later export of the module.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    exports: Arc<RwLock<IndexMap<String, Value>>>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an export by name
    pub fn get(&self, name: &str) -> Option<Value> {
        self.exports.read().get(name).cloned()
    }

    /// Set an export
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.exports.write().insert(name.into(), value);
    }

    /// Set several exports at once. Bindings absent from `entries` keep
    /// their previous values.
    pub fn export_all<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.exports.write().extend(entries);
    }

    pub fn has(&self, name: &str) -> bool {
        self.exports.read().contains_key(name)
    }

    pub fn keys(&self) -> Vec<String> {
        self.exports.read().keys().cloned().collect()
    }

    /// Snapshot all namespace entries.
    pub fn entries(&self) -> IndexMap<String, Value> {
        self.exports.read().clone()
    }

    /// Snapshot as a JSON object, used for `export * as ns`.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .exports
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Value::Object(map)
    }

    pub fn len(&self) -> usize {
        self.exports.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.read().is_empty()
    }

    /// Whether both handles share the same bindings.
    pub fn ptr_eq(&self, other: &Namespace) -> bool {
        Arc::ptr_eq(&self.exports, &other.exports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clones_observe_later_exports() {
        let ns = Namespace::new();
        let seen = ns.clone();
        ns.set("x", json!(1));

        assert_eq!(seen.get("x"), Some(json!(1)));
        assert!(seen.ptr_eq(&ns));
        assert!(!Namespace::new().ptr_eq(&ns));
    }

    #[test]
    fn export_all_keeps_absent_keys() {
        let ns = Namespace::new();
        ns.set("a", json!(1));
        ns.set("b", json!(2));
        ns.export_all([("b".to_string(), json!(20)), ("c".to_string(), json!(30))]);

        assert_eq!(ns.keys(), vec!["a", "b", "c"]);
        assert_eq!(ns.get("b"), Some(json!(20)));
        assert_eq!(ns.to_value(), json!({"a": 1, "b": 20, "c": 30}));
    }
}

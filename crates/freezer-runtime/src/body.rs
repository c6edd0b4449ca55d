//! Register-style module bodies.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::ExecutionError;
use crate::namespace::Namespace;

/// Receives a dependency's current namespace. Called before every execution
/// attempt and whenever the dependency's exports change.
pub type Setter = Box<dyn FnMut(&Namespace) + Send>;

/// Runs the module, writing its bindings into the given namespace.
pub type Execute = Box<dyn FnMut(&Namespace) -> Result<(), ExecutionError> + Send>;

/// Executable part of a module: one setter per dependency edge, in the
/// module's dependency order, plus the `execute` callback.
pub struct ModuleBody {
    setters: Vec<Setter>,
    execute: Execute,
}

impl ModuleBody {
    /// A body that ignores its imports.
    pub fn new<F>(execute: F) -> Self
    where
        F: FnMut(&Namespace) -> Result<(), ExecutionError> + Send + 'static,
    {
        Self {
            setters: Vec::new(),
            execute: Box::new(execute),
        }
    }

    /// Append the setter for the next dependency edge.
    pub fn setter<F>(mut self, setter: F) -> Self
    where
        F: FnMut(&Namespace) + Send + 'static,
    {
        self.setters.push(Box::new(setter));
        self
    }

    /// A body with `count` setters that hand their namespaces to `execute`,
    /// indexed by dependency position.
    ///
    /// ```rust
    /// use freezer_runtime::{ExecutionError, ModuleBody};
    ///
    /// let body = ModuleBody::with_imports(1, |imports, exports| {
    ///     let name = imports[0]
    ///         .get("name")
    ///         .ok_or_else(|| ExecutionError::missing("name"))?;
    ///     exports.set("greeting", name);
    ///     Ok(())
    /// });
    /// assert_eq!(body.setter_count(), 1);
    /// ```
    pub fn with_imports<F>(count: usize, mut execute: F) -> Self
    where
        F: FnMut(&[Namespace], &Namespace) -> Result<(), ExecutionError> + Send + 'static,
    {
        let imports: Arc<Mutex<Vec<Namespace>>> =
            Arc::new(Mutex::new((0..count).map(|_| Namespace::new()).collect()));

        let setters = (0..count)
            .map(|index| {
                let imports = Arc::clone(&imports);
                Box::new(move |namespace: &Namespace| {
                    imports.lock()[index] = namespace.clone();
                }) as Setter
            })
            .collect();

        Self {
            setters,
            execute: Box::new(move |exports| {
                let current = imports.lock().clone();
                execute(&current, exports)
            }),
        }
    }

    /// A JSON document: `default` is the whole value, and an object's
    /// top-level keys are exported as well.
    pub fn json(value: Value) -> Self {
        Self::new(move |exports| {
            if let Value::Object(map) = &value {
                exports.export_all(map.iter().map(|(key, value)| (key.clone(), value.clone())));
            }
            exports.set("default", value.clone());
            Ok(())
        })
    }

    /// An opaque script's result. Objects are exported wholesale (and as
    /// `default` unless they define one); anything else becomes `default`.
    pub fn standalone(value: Value) -> Self {
        Self::new(move |exports| {
            match &value {
                Value::Object(map) => {
                    exports.export_all(map.iter().map(|(key, value)| (key.clone(), value.clone())));
                    if !map.contains_key("default") {
                        exports.set("default", value.clone());
                    }
                }
                other => exports.set("default", other.clone()),
            }
            Ok(())
        })
    }

    pub fn setter_count(&self) -> usize {
        self.setters.len()
    }

    /// Invoke the setter at `index`. Bodies without setters ignore updates.
    pub(crate) fn update(&mut self, index: usize, namespace: &Namespace) {
        if let Some(setter) = self.setters.get_mut(index) {
            setter(namespace);
        }
    }

    pub(crate) fn run(&mut self, exports: &Namespace) -> Result<(), ExecutionError> {
        (self.execute)(exports)
    }
}

impl fmt::Debug for ModuleBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleBody")
            .field("setters", &self.setters.len())
            .finish_non_exhaustive()
    }
}

//! Edge metadata: which names flow along a dependency edge.

use serde::{Deserialize, Serialize};

/// A single name carried by an import or re-export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    /// Name in the dependency; `*` for namespace and star bindings.
    pub imported: Option<String>,
    /// Name inside the importing module.
    pub local: Option<String>,
    /// Outward name of a re-export.
    pub exported: Option<String>,
    pub is_namespace: bool,
    pub is_reexport: bool,
}

impl Binding {
    /// `import { imported as local } from '...'`
    pub fn named(imported: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            imported: Some(imported.into()),
            local: Some(local.into()),
            exported: None,
            is_namespace: false,
            is_reexport: false,
        }
    }

    /// `import local from '...'`
    pub fn default_import(local: impl Into<String>) -> Self {
        Self::named("default", local)
    }

    /// `import * as local from '...'`
    pub fn namespace(local: impl Into<String>) -> Self {
        Self {
            imported: Some("*".to_string()),
            local: Some(local.into()),
            exported: None,
            is_namespace: true,
            is_reexport: false,
        }
    }

    /// `export { imported as exported } from '...'`
    pub fn re_export(imported: impl Into<String>, exported: impl Into<String>) -> Self {
        Self {
            imported: Some(imported.into()),
            local: None,
            exported: Some(exported.into()),
            is_namespace: false,
            is_reexport: true,
        }
    }

    /// `export * from '...'`
    pub fn star_reexport() -> Self {
        Self {
            imported: Some("*".to_string()),
            local: None,
            exported: None,
            is_namespace: false,
            is_reexport: true,
        }
    }

    /// `export * as exported from '...'`
    pub fn namespace_reexport(exported: impl Into<String>) -> Self {
        Self {
            imported: Some("*".to_string()),
            local: None,
            exported: Some(exported.into()),
            is_namespace: true,
            is_reexport: true,
        }
    }

    pub fn is_star_reexport(&self) -> bool {
        self.is_reexport && !self.is_namespace && self.imported.as_deref() == Some("*")
    }
}

/// Metadata of one `importer -> dependency` edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Bindings in order of first appearance; never contains duplicates.
    pub bindings: Vec<Binding>,
    /// The specifier named a package (or script) rather than a file inside one.
    pub is_package_import: bool,
}

impl DependencyEdge {
    pub fn new(bindings: Vec<Binding>, is_package_import: bool) -> Self {
        let mut edge = Self {
            bindings: Vec::with_capacity(bindings.len()),
            is_package_import,
        };
        edge.merge(bindings);
        edge
    }

    /// Append bindings not yet on the edge. Returns how many were added.
    pub fn merge(&mut self, bindings: impl IntoIterator<Item = Binding>) -> usize {
        let before = self.bindings.len();
        for binding in bindings {
            if !self.bindings.contains(&binding) {
                self.bindings.push(binding);
            }
        }
        self.bindings.len() - before
    }

    pub fn reexports(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter().filter(|binding| binding.is_reexport)
    }

    pub fn has_reexports(&self) -> bool {
        self.bindings.iter().any(|binding| binding.is_reexport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_skips_duplicate_bindings() {
        let mut edge = DependencyEdge::new(vec![Binding::named("a", "a")], false);
        let added = edge.merge(vec![Binding::named("a", "a"), Binding::namespace("ns")]);

        assert_eq!(added, 1);
        assert_eq!(edge.bindings.len(), 2);
    }

    #[test]
    fn star_reexport_is_not_namespace() {
        assert!(Binding::star_reexport().is_star_reexport());
        assert!(!Binding::namespace_reexport("ns").is_star_reexport());
        assert!(!Binding::namespace("ns").is_star_reexport());
    }
}

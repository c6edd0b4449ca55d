//! Package-level views of the graph.

use indexmap::IndexSet;

use super::graph::ModuleGraph;
use crate::module_id::ModuleId;
use crate::package::Package;

impl ModuleGraph {
    pub fn package(&self, name: &str) -> Option<Package> {
        self.inner.read().packages.get(name).cloned()
    }

    /// Packages in the order they were first seen.
    pub fn packages(&self) -> Vec<Package> {
        self.inner.read().packages.values().cloned().collect()
    }

    pub fn package_of(&self, id: &ModuleId) -> Option<Package> {
        let inner = self.inner.read();
        let name = inner.modules.get(id)?.package.as_ref()?;
        inner.packages.get(name).cloned()
    }

    /// Other packages reached by any edge leaving `name`'s modules.
    ///
    /// Edges into package-less modules (standalone scripts, `@empty`) don't
    /// count.
    pub fn package_forward_deps(&self, name: &str) -> IndexSet<String> {
        let edges = self.refresh();
        let inner = self.inner.read();
        let Some(package) = inner.packages.get(name) else {
            return IndexSet::new();
        };

        let mut deps = IndexSet::new();
        for id in &package.modules {
            for dep in edges.dedup_edges(id) {
                let dep_package = inner
                    .modules
                    .get(dep)
                    .and_then(|record| record.package.as_deref());
                match dep_package {
                    Some(dep_package) if dep_package != name => {
                        deps.insert(dep_package.to_string());
                    }
                    _ => {}
                }
            }
        }
        deps
    }

    pub fn package_dependency_count(&self, name: &str) -> usize {
        self.package_forward_deps(name).len()
    }

    /// Dependencies of `id` that belong to `package`.
    pub fn dependencies_located_in(&self, id: &ModuleId, package: &str) -> Vec<ModuleId> {
        let edges = self.refresh();
        let inner = self.inner.read();
        edges
            .dedup_edges(id)
            .iter()
            .filter(|dep| {
                inner
                    .modules
                    .get(*dep)
                    .is_some_and(|record| record.package.as_deref() == Some(package))
            })
            .cloned()
            .collect()
    }

    /// Dependents of `id` that don't belong to `package`.
    pub fn dependents_outside_package(&self, id: &ModuleId, package: &str) -> Vec<ModuleId> {
        let edges = self.refresh();
        let inner = self.inner.read();
        edges
            .inverse_edges(id)
            .iter()
            .filter(|dependent| {
                inner
                    .modules
                    .get(*dependent)
                    .is_some_and(|record| record.package.as_deref() != Some(package))
            })
            .cloned()
            .collect()
    }
}

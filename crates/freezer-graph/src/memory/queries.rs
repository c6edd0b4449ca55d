//! Read-only lookups on ModuleGraph.

use std::sync::Arc;

use super::edges::EdgeIndex;
use super::graph::ModuleGraph;
use crate::module::{ModuleKind, ModuleRecord, ResolutionState};
use crate::module_id::ModuleId;

impl ModuleGraph {
    /// Snapshot of a module record, with an up-to-date dependents set.
    pub fn module(&self, id: &ModuleId) -> Option<ModuleRecord> {
        self.refresh();
        self.inner.read().modules.get(id).cloned()
    }

    /// Snapshot of every module, in insertion order.
    pub fn modules(&self) -> Vec<ModuleRecord> {
        self.refresh();
        self.inner.read().modules.values().cloned().collect()
    }

    pub fn module_ids(&self) -> Vec<ModuleId> {
        self.inner.read().modules.keys().cloned().collect()
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.inner.read().modules.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().modules.is_empty()
    }

    /// Package and in-package name of a module, without cloning its edges.
    pub(crate) fn module_context(&self, id: &ModuleId) -> Option<(Option<String>, String)> {
        self.inner
            .read()
            .modules
            .get(id)
            .map(|record| (record.package.clone(), record.name.clone()))
    }

    /// `(id, kind, package)` for every module, in insertion order.
    pub(crate) fn module_summaries(&self) -> Vec<(ModuleId, ModuleKind, Option<String>)> {
        self.inner
            .read()
            .modules
            .values()
            .map(|record| (record.id.clone(), record.kind, record.package.clone()))
            .collect()
    }

    pub fn kind(&self, id: &ModuleId) -> Option<ModuleKind> {
        self.inner.read().modules.get(id).map(|record| record.kind)
    }

    pub fn resolution(&self, id: &ModuleId) -> Option<ResolutionState> {
        self.inner.read().modules.get(id).map(|record| record.resolution)
    }

    /// Direct dependencies in declaration order.
    pub fn dependencies(&self, id: &ModuleId) -> Vec<ModuleId> {
        self.inner
            .read()
            .modules
            .get(id)
            .map(|record| record.dependencies.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Modules that depend on `id` directly.
    pub fn dependents(&self, id: &ModuleId) -> Vec<ModuleId> {
        self.refresh().inverse_edges(id).to_vec()
    }

    pub fn dedup_edges(&self, id: &ModuleId) -> Vec<ModuleId> {
        self.refresh().dedup_edges(id).to_vec()
    }

    pub fn inverse_edges(&self, id: &ModuleId) -> Vec<ModuleId> {
        self.refresh().inverse_edges(id).to_vec()
    }

    /// Shared snapshot of the derived edge views.
    pub fn edge_index(&self) -> Arc<EdgeIndex> {
        self.refresh()
    }

    /// Modules kept out of emitted bundles: those of excluded packages, and
    /// package-less modules other than standalone scripts and `@empty`.
    pub fn is_excluded(&self, id: &ModuleId) -> bool {
        let inner = self.inner.read();
        let Some(record) = inner.modules.get(id) else {
            return false;
        };
        match &record.package {
            Some(name) => inner
                .packages
                .get(name)
                .is_some_and(|package| package.excluded),
            None => !record.is_global(),
        }
    }

    pub fn modules_with_state(&self, state: ResolutionState) -> Vec<ModuleId> {
        self.inner
            .read()
            .modules
            .values()
            .filter(|record| record.resolution == state)
            .map(|record| record.id.clone())
            .collect()
    }
}

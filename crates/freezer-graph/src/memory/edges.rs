use indexmap::IndexMap;

use crate::module::ModuleRecord;
use crate::module_id::ModuleId;

/// Deduplicated successor lists and their exact transpose.
///
/// Built from a snapshot of the graph; every module has an entry in both
/// directions, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeIndex {
    forward: IndexMap<ModuleId, Vec<ModuleId>>,
    inverse: IndexMap<ModuleId, Vec<ModuleId>>,
}

impl EdgeIndex {
    pub(crate) fn build(modules: &IndexMap<ModuleId, ModuleRecord>) -> Self {
        let mut forward = IndexMap::with_capacity(modules.len());
        let mut inverse: IndexMap<ModuleId, Vec<ModuleId>> = modules
            .keys()
            .map(|id| (id.clone(), Vec::new()))
            .collect();

        for (id, record) in modules {
            let successors: Vec<ModuleId> = record
                .dependencies
                .keys()
                .filter(|dep| *dep != id)
                .cloned()
                .collect();

            for dep in &successors {
                inverse.entry(dep.clone()).or_default().push(id.clone());
            }
            forward.insert(id.clone(), successors);
        }

        Self { forward, inverse }
    }

    /// Successors of `id`, each listed once.
    pub fn dedup_edges(&self, id: &ModuleId) -> &[ModuleId] {
        self.forward.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Predecessors of `id`: every module whose successors contain it.
    pub fn inverse_edges(&self, id: &ModuleId) -> &[ModuleId] {
        self.inverse.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Module ids in graph insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.forward.keys()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }
}

//! Core ModuleGraph structure and inner state.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::edges::EdgeIndex;
use crate::module::ModuleRecord;
use crate::module_id::ModuleId;
use crate::package::Package;

/// In-memory module dependency graph.
///
/// A cheap, clonable handle: clones share the same records. Any number of
/// readers, one writer at a time.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    pub(super) inner: Arc<RwLock<GraphInner>>,
}

#[derive(Debug, Default)]
pub(super) struct GraphInner {
    /// All modules indexed by ID, in insertion order
    pub modules: IndexMap<ModuleId, ModuleRecord>,
    /// Packages in the order they were first seen
    pub packages: IndexMap<String, Package>,
    /// Derived edge views; stale while `dirty` is set
    pub edges: Arc<EdgeIndex>,
    pub dirty: bool,
}

impl GraphInner {
    fn rebuild_derived(&mut self) {
        let index = EdgeIndex::build(&self.modules);
        for record in self.modules.values_mut() {
            record.dependents = index.inverse_edges(&record.id).iter().cloned().collect();
        }
        tracing::trace!(
            modules = index.len(),
            edges = index.edge_count(),
            "rebuilt derived edge index"
        );
        self.edges = Arc::new(index);
        self.dirty = false;
    }
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derived edge views, rebuilt first if a mutation made them stale.
    pub(super) fn refresh(&self) -> Arc<EdgeIndex> {
        {
            let inner = self.inner.read();
            if !inner.dirty {
                return Arc::clone(&inner.edges);
            }
        }

        let mut inner = self.inner.write();
        if inner.dirty {
            inner.rebuild_derived();
        }
        Arc::clone(&inner.edges)
    }
}

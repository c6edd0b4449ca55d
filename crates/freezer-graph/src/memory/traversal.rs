//! Graph traversal over the deduplicated edges.

use indexmap::IndexSet;

use super::graph::ModuleGraph;
use crate::module_id::ModuleId;

impl ModuleGraph {
    /// Every module reachable from `root`, `root` first, in depth-first
    /// preorder. Empty if `root` is unknown.
    pub fn reachable_from(&self, root: &ModuleId) -> IndexSet<ModuleId> {
        let edges = self.refresh();
        let mut visited = IndexSet::new();
        if !self.contains(root) {
            return visited;
        }

        let mut stack = vec![root.clone()];
        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            // reversed so the first declared dependency is visited first
            for dep in edges.dedup_edges(&current).iter().rev() {
                if !visited.contains(dep) {
                    stack.push(dep.clone());
                }
            }
        }
        visited
    }

    /// Modules `id` depends on directly or indirectly (excluding itself
    /// unless it sits on a cycle).
    pub fn transitive_dependencies(&self, id: &ModuleId) -> IndexSet<ModuleId> {
        let edges = self.refresh();
        let mut visited = IndexSet::new();
        let mut stack: Vec<ModuleId> = edges.dedup_edges(id).iter().rev().cloned().collect();

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for dep in edges.dedup_edges(&current).iter().rev() {
                if !visited.contains(dep) {
                    stack.push(dep.clone());
                }
            }
        }
        visited
    }

    /// Whether `from` depends on `to`, directly or transitively.
    pub fn depends_on(&self, from: &ModuleId, to: &ModuleId) -> bool {
        self.transitive_dependencies(from).contains(to)
    }
}

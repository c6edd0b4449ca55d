use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::module_id::ModuleId;

/// Inputs to [`ModuleGraph::compute_load_plan`](crate::ModuleGraph::compute_load_plan).
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Restrict the plan to modules reachable from this module (inclusive).
    pub root: Option<ModuleId>,
    /// Modules the host has already made available. They are ordered with
    /// the global modules and satisfy any edge into them.
    pub pre_satisfied: IndexSet<ModuleId>,
}

impl PlanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, root: ModuleId) -> Self {
        self.root = Some(root);
        self
    }

    pub fn pre_satisfied<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ModuleId>,
    {
        self.pre_satisfied.extend(ids);
        self
    }
}

/// A load order for a set of modules. Computed fresh on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadPlan {
    /// Every planned module exactly once.
    pub ordered_modules: Vec<ModuleId>,
    /// Modules placed without all their dependencies before them.
    pub unresolved_modules: Vec<ModuleId>,
    pub ordered_packages: Vec<String>,
    /// Packages caught in a package-level cycle; their modules were ordered
    /// in the residual pass.
    pub unsortable_packages: Vec<String>,
    /// Package modules not reachable from their package's entry point.
    pub detached_modules: Vec<ModuleId>,
}

impl LoadPlan {
    pub fn len(&self) -> usize {
        self.ordered_modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleId> {
        self.ordered_modules.iter()
    }

    pub fn position(&self, id: &ModuleId) -> Option<usize> {
        self.ordered_modules.iter().position(|candidate| candidate == id)
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.position(id).is_some()
    }

    pub fn is_unresolved(&self, id: &ModuleId) -> bool {
        self.unresolved_modules.contains(id)
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved_modules.is_empty()
    }
}

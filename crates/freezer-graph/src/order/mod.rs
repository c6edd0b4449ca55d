//! Load-order scheduling.
//!
//! The plan is built in four steps:
//!
//! 1. **Partition.** Standalone, empty and pre-satisfied modules are global.
//!    Package modules reachable from their package's entry point form that
//!    package's partition; the rest are detached.
//! 2. **Order packages** by their forward dependencies on other packages.
//!    Packages caught in a cycle are unsortable.
//! 3. **Order modules** of each ordered package. Modules stalled on a cycle
//!    inside the package are appended anyway and flagged unresolved; modules
//!    stalled on a module placed later (a detached one) wait for the
//!    residual pass.
//! 4. **Residual pass** over detached modules, deferred modules and the
//!    modules of unsortable packages.
//!
//! Global modules go first, ordered among themselves by the same greedy
//! pass. Every step works on a fresh copy of the deduplicated edges with
//! the modules placed so far pruned.

mod greedy;
mod partition;
mod plan;

pub use plan::{LoadPlan, PlanOptions};

use indexmap::IndexSet;
use rustc_hash::FxHashSet as HashSet;

use crate::memory::ModuleGraph;
use crate::module_id::ModuleId;

use greedy::{Phase, run_phase};
use partition::partition;

impl ModuleGraph {
    /// Compute a load order for the graph, or for the part of it reachable
    /// from `options.root`.
    ///
    /// Never fails: cycles and unorderable leftovers are placed anyway and
    /// listed in [`LoadPlan::unresolved_modules`].
    pub fn compute_load_plan(&self, options: &PlanOptions) -> LoadPlan {
        let edges = self.edge_index();
        let parts = partition(self, &edges, options);
        let successors = |id: &ModuleId| edges.dedup_edges(id).to_vec();

        let mut plan = LoadPlan {
            detached_modules: parts.detached.clone(),
            ..LoadPlan::default()
        };
        let mut placed: HashSet<ModuleId> = HashSet::default();
        let mut residual: Vec<ModuleId> = Vec::new();

        // globals
        let phase = run_phase(parts.globals.clone(), successors, &mut placed);
        plan.ordered_modules.extend(phase.ordered);
        let cyclic = phase.cyclic;
        plan.ordered_modules.extend(cyclic.iter().cloned());
        plan.unresolved_modules.extend(cyclic.iter().cloned());
        placed.extend(cyclic);
        residual.extend(phase.deferred);

        // packages
        let package_deps = |name: &String| -> Vec<String> {
            let mut deps = IndexSet::new();
            for id in parts.packages.get(name).into_iter().flatten() {
                for dep in edges.dedup_edges(id) {
                    match parts.owner.get(dep) {
                        Some(owner) if owner != name => {
                            deps.insert(owner.clone());
                        }
                        _ => {}
                    }
                }
            }
            deps.into_iter().collect()
        };
        let mut ordered_packages = HashSet::default();
        let package_phase = run_phase(
            parts.packages.keys().cloned().collect(),
            package_deps,
            &mut ordered_packages,
        );
        plan.ordered_packages = package_phase.ordered.clone();
        plan.unsortable_packages = package_phase.stalled();

        tracing::debug!(
            globals = parts.globals.len(),
            packages = plan.ordered_packages.len(),
            unsortable = plan.unsortable_packages.len(),
            detached = parts.detached.len(),
            "partitioned modules for load plan"
        );

        for name in &plan.ordered_packages {
            let members = parts.packages.get(name).cloned().unwrap_or_default();
            let phase = run_phase(members, successors, &mut placed);
            plan.ordered_modules.extend(phase.ordered);

            if !phase.cyclic.is_empty() {
                tracing::debug!(
                    package = %name,
                    modules = phase.cyclic.len(),
                    "appending cyclic package modules"
                );
            }
            plan.ordered_modules.extend(phase.cyclic.iter().cloned());
            plan.unresolved_modules.extend(phase.cyclic.iter().cloned());
            placed.extend(phase.cyclic);
            residual.extend(phase.deferred);
        }

        // residual: deferred, detached, then unsortable packages
        residual.extend(parts.detached.iter().cloned());
        for name in &plan.unsortable_packages {
            residual.extend(parts.packages.get(name).into_iter().flatten().cloned());
        }
        let Phase {
            ordered,
            cyclic,
            deferred,
        } = run_phase(residual, successors, &mut placed);
        plan.ordered_modules.extend(ordered);
        for stalled in [cyclic, deferred] {
            plan.ordered_modules.extend(stalled.iter().cloned());
            plan.unresolved_modules.extend(stalled);
        }

        if plan.unresolved_modules.is_empty() {
            tracing::debug!(modules = plan.ordered_modules.len(), "computed load plan");
        } else {
            tracing::warn!(
                modules = plan.ordered_modules.len(),
                unresolved = plan.unresolved_modules.len(),
                "load plan contains modules with unsatisfied dependencies"
            );
        }

        plan
    }
}

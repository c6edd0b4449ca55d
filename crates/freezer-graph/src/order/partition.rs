//! Splitting planned modules into globals, package partitions and detached
//! modules.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap as HashMap;

use crate::memory::{EdgeIndex, ModuleGraph};
use crate::module::ModuleKind;
use crate::module_id::ModuleId;

use super::plan::PlanOptions;

#[derive(Debug, Default)]
pub(super) struct Partition {
    /// Standalone, empty and pre-satisfied modules.
    pub globals: Vec<ModuleId>,
    /// Package modules reachable from their package's entry point, per
    /// package, in package order. Packages with only detached modules have
    /// an empty partition.
    pub packages: IndexMap<String, Vec<ModuleId>>,
    pub detached: Vec<ModuleId>,
    /// Owning package of every non-global planned module.
    pub owner: HashMap<ModuleId, String>,
}

pub(super) fn partition(graph: &ModuleGraph, edges: &EdgeIndex, options: &PlanOptions) -> Partition {
    let scope: Option<IndexSet<ModuleId>> =
        options.root.as_ref().map(|root| graph.reachable_from(root));

    let mut result = Partition::default();
    for package in graph.packages() {
        result.packages.insert(package.name, Vec::new());
    }

    let entry_points: HashMap<String, ModuleId> = graph
        .packages()
        .into_iter()
        .map(|package| (package.name, package.entry_point))
        .collect();
    let mut reach: HashMap<String, IndexSet<ModuleId>> = HashMap::default();

    for (id, kind, package) in graph.module_summaries() {
        if scope.as_ref().is_some_and(|scope| !scope.contains(&id)) {
            continue;
        }

        let package = match package {
            Some(package) if !is_global(kind, &id, options) => package,
            _ => {
                result.globals.push(id);
                continue;
            }
        };

        let members = reach.entry(package.clone()).or_insert_with(|| {
            entry_points
                .get(&package)
                .map(|entry| reachable(edges, entry))
                .unwrap_or_default()
        });

        if members.contains(&id) {
            result.packages.entry(package.clone()).or_default().push(id.clone());
        } else {
            result.detached.push(id.clone());
        }
        result.owner.insert(id, package);
    }

    // packages with no planned module at all take no part in ordering
    let owners: IndexSet<&String> = result.owner.values().collect();
    let keep: IndexSet<String> = result
        .packages
        .keys()
        .filter(|name| owners.contains(name))
        .cloned()
        .collect();
    result.packages.retain(|name, _| keep.contains(name));

    result
}

fn is_global(kind: ModuleKind, id: &ModuleId, options: &PlanOptions) -> bool {
    kind.is_global() || options.pre_satisfied.contains(id)
}

/// Depth-first reachability over the deduplicated edges, `from` included.
fn reachable(edges: &EdgeIndex, from: &ModuleId) -> IndexSet<ModuleId> {
    let mut seen = IndexSet::new();
    let mut stack = vec![from.clone()];
    while let Some(current) = stack.pop() {
        if seen.insert(current.clone()) {
            stack.extend(edges.dedup_edges(&current).iter().rev().cloned());
        }
    }
    seen
}

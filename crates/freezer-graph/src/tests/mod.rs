mod graph_tests;
mod order_tests;
mod resolver_tests;

use crate::{DependencyEdge, ModuleGraph, ModuleId, ModuleKind, ModuleRecord};

/// Id of `path` in package `pkg` at version 1.0.0.
pub(crate) fn pkg_id(pkg: &str, path: &str) -> ModuleId {
    ModuleId::in_package(pkg, "1.0.0", path)
}

/// Add a source module of `pkg` at `path`.
pub(crate) fn add_source(graph: &ModuleGraph, pkg: &str, path: &str) -> ModuleId {
    let id = pkg_id(pkg, path);
    graph.add_module(
        ModuleRecord::builder(id.clone(), ModuleKind::Source)
            .name(path)
            .package(pkg)
            .build(),
    );
    id
}

pub(crate) fn add_standalone(graph: &ModuleGraph, name: &str) -> ModuleId {
    let id = ModuleId::standalone(name);
    graph.add_module(ModuleRecord::builder(id.clone(), ModuleKind::Standalone).build());
    id
}

pub(crate) fn depend(graph: &ModuleGraph, from: &ModuleId, to: &ModuleId) {
    graph
        .add_dependency(from, to, DependencyEdge::default())
        .unwrap();
}

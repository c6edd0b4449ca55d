use super::{add_source, add_standalone, depend, pkg_id};
use crate::{
    Binding, DependencyEdge, Error, ModuleGraph, ModuleId, ModuleKind, ModuleRecord, Package,
    ResolutionState,
};

#[test]
fn add_module_is_idempotent() {
    let graph = ModuleGraph::new();
    let id = add_source(&graph, "app", "/index.js");

    let duplicate = ModuleRecord::builder(id.clone(), ModuleKind::Json)
        .package("app")
        .build();
    assert!(!graph.add_module(duplicate));
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.kind(&id), Some(ModuleKind::Source));
    assert_eq!(graph.package("app").unwrap().modules.len(), 1);
}

#[test]
fn repeated_edges_merge_bindings() {
    let graph = ModuleGraph::new();
    let a = add_source(&graph, "app", "/a.js");
    let b = add_source(&graph, "app", "/b.js");

    let first = DependencyEdge::new(vec![Binding::named("x", "x")], false);
    let second = DependencyEdge::new(vec![Binding::named("x", "x"), Binding::named("y", "y")], false);
    assert!(graph.add_dependency(&a, &b, first).unwrap());
    assert!(!graph.add_dependency(&a, &b, second).unwrap());

    let record = graph.module(&a).unwrap();
    assert_eq!(record.dependencies.len(), 1);
    assert_eq!(
        record.dependencies[&b].bindings,
        vec![Binding::named("x", "x"), Binding::named("y", "y")]
    );
    assert_eq!(graph.dedup_edges(&a), vec![b]);
}

#[test]
fn self_edges_are_never_recorded() {
    let graph = ModuleGraph::new();
    let a = add_source(&graph, "app", "/a.js");

    assert!(!graph.add_dependency(&a, &a, DependencyEdge::default()).unwrap());
    assert!(graph.dependencies(&a).is_empty());
    assert!(graph.dependents(&a).is_empty());
}

#[test]
fn edges_to_unknown_modules_are_rejected() {
    let graph = ModuleGraph::new();
    let a = add_source(&graph, "app", "/a.js");
    let ghost = pkg_id("app", "/ghost.js");

    let result = graph.add_dependency(&a, &ghost, DependencyEdge::default());
    assert!(matches!(result, Err(Error::UnknownModule(id)) if id == ghost));
}

#[test]
fn dependents_follow_mutations() {
    let graph = ModuleGraph::new();
    let a = add_source(&graph, "app", "/a.js");
    let b = add_source(&graph, "app", "/b.js");
    let c = add_source(&graph, "app", "/c.js");

    depend(&graph, &b, &a);
    assert_eq!(graph.dependents(&a), vec![b.clone()]);

    depend(&graph, &c, &a);
    assert_eq!(graph.dependents(&a), vec![b.clone(), c.clone()]);
    assert_eq!(
        graph.module(&a).unwrap().dependents.into_iter().collect::<Vec<_>>(),
        vec![b, c]
    );
}

#[test]
fn inverse_edges_are_the_transpose() {
    let graph = ModuleGraph::new();
    let a = add_source(&graph, "app", "/a.js");
    let b = add_source(&graph, "app", "/b.js");
    let c = add_source(&graph, "app", "/c.js");
    depend(&graph, &a, &b);
    depend(&graph, &a, &c);
    depend(&graph, &b, &c);
    depend(&graph, &c, &a);

    let index = graph.edge_index();
    for from in index.ids() {
        for to in index.dedup_edges(from) {
            assert!(index.inverse_edges(to).contains(from));
        }
        for pred in index.inverse_edges(from) {
            assert!(index.dedup_edges(pred).contains(from));
        }
    }
    assert_eq!(index.edge_count(), 4);
}

#[test]
fn traversal_queries() {
    let graph = ModuleGraph::new();
    let a = add_source(&graph, "app", "/a.js");
    let b = add_source(&graph, "app", "/b.js");
    let c = add_source(&graph, "app", "/c.js");
    let d = add_source(&graph, "app", "/d.js");
    depend(&graph, &a, &b);
    depend(&graph, &b, &c);

    assert!(graph.depends_on(&a, &c));
    assert!(!graph.depends_on(&c, &a));

    let reachable: Vec<_> = graph.reachable_from(&a).into_iter().collect();
    assert_eq!(reachable, vec![a.clone(), b, c]);
    assert!(!graph.reachable_from(&a).contains(&d));
    assert!(graph.reachable_from(&pkg_id("app", "/missing.js")).is_empty());
}

#[test]
fn package_queries() {
    let graph = ModuleGraph::new();
    graph.add_package(Package::new("lib", "1.0.0", "/index.js").excluded(true));

    let app = add_source(&graph, "app", "/index.js");
    let app_util = add_source(&graph, "app", "/util.js");
    let lib = add_source(&graph, "lib", "/index.js");
    let vendor = add_standalone(&graph, "vendor/jq.js");

    depend(&graph, &app, &app_util);
    depend(&graph, &app, &lib);
    depend(&graph, &app_util, &vendor);

    let deps: Vec<_> = graph.package_forward_deps("app").into_iter().collect();
    assert_eq!(deps, vec!["lib".to_string()]);
    assert_eq!(graph.package_dependency_count("lib"), 0);

    assert_eq!(graph.dependencies_located_in(&app, "lib"), vec![lib.clone()]);
    assert_eq!(graph.dependents_outside_package(&lib, "lib"), vec![app.clone()]);
    assert!(graph.dependents_outside_package(&app_util, "app").is_empty());

    assert!(graph.is_excluded(&lib));
    assert!(!graph.is_excluded(&app));
    assert!(!graph.is_excluded(&vendor));
    assert_eq!(graph.package_of(&app).unwrap().name, "app");
}

#[test]
fn resolution_state_updates() {
    let graph = ModuleGraph::new();
    let a = add_source(&graph, "app", "/a.js");
    assert_eq!(graph.resolution(&a), Some(ResolutionState::Unresolved));

    graph.set_resolution(&a, ResolutionState::Failed).unwrap();
    assert_eq!(graph.modules_with_state(ResolutionState::Failed), vec![a]);

    let ghost = ModuleId::standalone("ghost.js");
    assert!(graph.set_resolution(&ghost, ResolutionState::Resolved).is_err());
}

#[test]
fn clones_share_state() {
    let graph = ModuleGraph::new();
    let handle = graph.clone();
    add_source(&graph, "app", "/a.js");
    assert_eq!(handle.len(), 1);
}

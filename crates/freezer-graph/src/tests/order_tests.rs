use super::{add_source, add_standalone, depend, pkg_id};
use crate::{LoadPlan, ModuleGraph, ModuleId, ModuleRecord, Package, PlanOptions};

fn order(plan: &LoadPlan) -> Vec<&str> {
    plan.ordered_modules.iter().map(ModuleId::as_str).collect()
}

fn assert_dependencies_first(graph: &ModuleGraph, plan: &LoadPlan) {
    for id in &plan.ordered_modules {
        let at = plan.position(id).unwrap();
        for dep in graph.dedup_edges(id) {
            let dep_at = plan.position(&dep).unwrap();
            assert!(dep_at < at, "{dep} must load before {id}");
        }
    }
}

#[test]
fn chain_with_reexport_orders_leaves_first() {
    let graph = ModuleGraph::new();
    let c = add_source(&graph, "app", "/index.js");
    let b = add_source(&graph, "app", "/b.js");
    let a = add_source(&graph, "app", "/a.js");
    depend(&graph, &c, &b);
    depend(&graph, &c, &a);
    depend(&graph, &b, &a);

    let plan = graph.compute_load_plan(&PlanOptions::default());
    assert_eq!(plan.ordered_modules, vec![a, b, c]);
    assert!(plan.is_complete());
    assert_eq!(plan.ordered_packages, vec!["app".to_string()]);
}

#[test]
fn globals_load_before_packages() {
    let graph = ModuleGraph::new();
    let index = add_source(&graph, "app", "/index.js");
    let jq = add_standalone(&graph, "vendor/jq.js");
    let plugin = add_standalone(&graph, "vendor/jq-plugin.js");
    graph.add_module(ModuleRecord::empty());
    depend(&graph, &index, &plugin);
    depend(&graph, &index, &ModuleId::empty());
    depend(&graph, &plugin, &jq);

    let plan = graph.compute_load_plan(&PlanOptions::default());
    assert_eq!(
        order(&plan),
        vec![
            "local://vendor/jq.js",
            "@empty",
            "local://vendor/jq-plugin.js",
            "local://app@1.0.0/index.js",
        ]
    );
    assert_dependencies_first(&graph, &plan);
}

#[test]
fn packages_follow_their_dependencies() {
    let graph = ModuleGraph::new();
    let app = add_source(&graph, "app", "/index.js");
    let ui = add_source(&graph, "ui", "/index.js");
    let ui_button = add_source(&graph, "ui", "/button.js");
    let lang = add_source(&graph, "lang", "/index.js");
    depend(&graph, &app, &ui);
    depend(&graph, &ui, &ui_button);
    depend(&graph, &ui_button, &lang);
    depend(&graph, &app, &lang);

    let plan = graph.compute_load_plan(&PlanOptions::default());
    assert_eq!(plan.ordered_packages, vec!["lang", "ui", "app"]);
    assert_eq!(plan.ordered_modules, vec![lang, ui_button, ui, app]);
    assert_dependencies_first(&graph, &plan);
}

#[test]
fn orphan_module_only_appears_in_residual_pass() {
    let graph = ModuleGraph::new();
    let index = add_source(&graph, "pkg1", "/index.js");
    let dead = add_source(&graph, "pkg1", "/dead.js");
    let util = add_source(&graph, "pkg1", "/util.js");
    let other = add_source(&graph, "pkg2", "/index.js");
    depend(&graph, &index, &util);
    depend(&graph, &other, &index);

    let plan = graph.compute_load_plan(&PlanOptions::default());
    assert_eq!(plan.detached_modules, vec![dead.clone()]);
    // the residual pass runs after every ordered package
    assert_eq!(plan.ordered_modules, vec![util, index, other, dead]);
    assert!(plan.is_complete());
}

#[test]
fn module_waiting_on_detached_module_is_deferred() {
    let graph = ModuleGraph::new();
    let lib_index = add_source(&graph, "lib", "/index.js");
    let lib_extra = add_source(&graph, "lib", "/extra.js");
    let app = add_source(&graph, "app", "/index.js");
    depend(&graph, &app, &lib_extra);
    depend(&graph, &app, &lib_index);

    let plan = graph.compute_load_plan(&PlanOptions::default());
    assert_eq!(plan.detached_modules, vec![lib_extra.clone()]);
    assert!(plan.is_complete());
    assert_dependencies_first(&graph, &plan);
    assert_eq!(plan.ordered_modules.last(), Some(&app));
}

#[test]
fn module_cycle_is_contained() {
    let graph = ModuleGraph::new();
    let index = add_source(&graph, "app", "/index.js");
    let x = add_source(&graph, "app", "/x.js");
    let y = add_source(&graph, "app", "/y.js");
    let leaf = add_source(&graph, "app", "/leaf.js");
    depend(&graph, &index, &x);
    depend(&graph, &index, &leaf);
    depend(&graph, &x, &y);
    depend(&graph, &y, &x);

    let plan = graph.compute_load_plan(&PlanOptions::default());
    assert_eq!(plan.len(), 4);
    assert_eq!(plan.ordered_modules[0], leaf);
    assert!(plan.is_unresolved(&x));
    assert!(plan.is_unresolved(&y));
    assert!(plan.is_unresolved(&index));
    assert!(!plan.is_unresolved(&leaf));
}

#[test]
fn package_cycle_falls_back_to_residual_pass() {
    let graph = ModuleGraph::new();
    let a = add_source(&graph, "a", "/index.js");
    let a_helper = add_source(&graph, "a", "/helper.js");
    let b = add_source(&graph, "b", "/index.js");
    depend(&graph, &a, &b);
    depend(&graph, &b, &a_helper);
    depend(&graph, &a, &a_helper);

    let plan = graph.compute_load_plan(&PlanOptions::default());
    assert!(plan.ordered_packages.is_empty());
    assert_eq!(plan.unsortable_packages, vec!["a", "b"]);
    // the modules themselves are acyclic and still come out in order
    assert!(plan.is_complete());
    assert_eq!(plan.ordered_modules, vec![a_helper, b, a]);
}

#[test]
fn detached_cycle_is_flagged_in_residual_pass() {
    let graph = ModuleGraph::new();
    let index = add_source(&graph, "app", "/index.js");
    let x = add_source(&graph, "app", "/x.js");
    let y = add_source(&graph, "app", "/y.js");
    depend(&graph, &x, &y);
    depend(&graph, &y, &x);

    let plan = graph.compute_load_plan(&PlanOptions::default());
    assert_eq!(plan.detached_modules, vec![x.clone(), y.clone()]);
    assert_eq!(plan.ordered_modules[0], index);
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.unresolved_modules, vec![x, y]);
    assert!(!plan.is_unresolved(&index));
}

#[test]
fn root_restricts_the_plan() {
    let graph = ModuleGraph::new();
    let index = add_source(&graph, "app", "/index.js");
    let util = add_source(&graph, "app", "/util.js");
    let unrelated = add_source(&graph, "other", "/index.js");
    depend(&graph, &index, &util);

    let plan = graph.compute_load_plan(&PlanOptions::new().root(util.clone()));
    assert_eq!(plan.ordered_modules, vec![util.clone()]);

    let plan = graph.compute_load_plan(&PlanOptions::new().root(index.clone()));
    assert_eq!(plan.ordered_modules, vec![util, index]);
    assert!(!plan.contains(&unrelated));
}

#[test]
fn pre_satisfied_modules_are_global() {
    let graph = ModuleGraph::new();
    graph.add_package(Package::new("host", "1.0.0", "/index.js"));
    let env = add_source(&graph, "host", "/env.js");
    let app = add_source(&graph, "app", "/index.js");
    depend(&graph, &app, &env);

    let plan = graph.compute_load_plan(&PlanOptions::new().pre_satisfied([env.clone()]));
    assert_eq!(plan.ordered_modules, vec![env, app]);
    assert!(plan.detached_modules.is_empty());
    assert!(plan.is_complete());
}

#[test]
fn plans_are_deterministic() {
    let graph = ModuleGraph::new();
    for name in ["c", "a", "b"] {
        add_source(&graph, name, "/index.js");
    }
    let first = graph.compute_load_plan(&PlanOptions::default());
    let second = graph.compute_load_plan(&PlanOptions::default());

    assert_eq!(first, second);
    assert_eq!(
        first.ordered_modules,
        vec![pkg_id("c", "/index.js"), pkg_id("a", "/index.js"), pkg_id("b", "/index.js")]
    );
}

use freezer_config::{AliasTarget, FreezerConfig, PackageSpec, StandaloneSpec};

use crate::{
    GraphBuilder, MemorySource, ModuleGraph, ModuleId, ModuleKind, ModuleRecord,
    ResolutionError, Resolver,
};

fn config() -> FreezerConfig {
    FreezerConfig::default()
        .with_package(
            "app",
            PackageSpec::new("1.0.0")
                .with_main("./main.js")
                .with_root_url("http://localhost:9011/app")
                .with_alias("fs", AliasTarget::Conditional { node: "@empty".into() })
                .with_alias("jquery", AliasTarget::Specifier("./vendor/jquery.js".into()))
                .with_alias("lodash", AliasTarget::Specifier("lodash-es".into())),
        )
        .with_package("lively.lang", PackageSpec::new("2.1.0"))
        .with_package("@scope/kit", PackageSpec::new("0.3.0"))
}

fn app_main(graph: &ModuleGraph, resolver: &Resolver) -> ModuleId {
    resolver.resolve_entry(graph, "app").unwrap().module
}

#[test]
fn known_package_resolves_to_entry_point() {
    let graph = ModuleGraph::new();
    let resolver = Resolver::new(config());

    let resolved = resolver.resolve_entry(&graph, "app").unwrap();
    assert_eq!(resolved.module.as_str(), "local://app@1.0.0/main.js");
    assert!(resolved.is_package_import);
    assert!(resolved.created);

    let package = graph.package("app").unwrap();
    assert_eq!(package.entry_point, resolved.module);
    assert_eq!(package.root_url, "http://localhost:9011/app");

    let lang = resolver.resolve(&graph, &resolved.module, "lively.lang").unwrap();
    assert_eq!(lang.module.as_str(), "local://lively.lang@2.1.0/index.js");
}

#[test]
fn resolution_is_idempotent() {
    let graph = ModuleGraph::new();
    let resolver = Resolver::new(config());
    let main = app_main(&graph, &resolver);

    let first = resolver.resolve(&graph, &main, "./lib/util.js").unwrap();
    let second = resolver.resolve(&graph, &main, "./lib/./util.js").unwrap();

    assert_eq!(first.module, second.module);
    assert!(first.created);
    assert!(!second.created);
    assert_eq!(graph.len(), 2);
}

#[test]
fn relative_specifiers_stay_in_package() {
    let graph = ModuleGraph::new();
    let resolver = Resolver::new(config());
    let main = app_main(&graph, &resolver);

    let util = resolver.resolve(&graph, &main, "./lib/util.js").unwrap();
    assert_eq!(util.module.as_str(), "local://app@1.0.0/lib/util.js");
    assert!(!util.is_package_import);

    let sibling = resolver.resolve(&graph, &util.module, "../data/config.json").unwrap();
    assert_eq!(sibling.module.as_str(), "local://app@1.0.0/data/config.json");
    assert_eq!(graph.kind(&sibling.module), Some(ModuleKind::Json));

    let record = graph.module(&util.module).unwrap();
    assert_eq!(record.name, "/lib/util.js");
    assert_eq!(record.package.as_deref(), Some("app"));
}

#[test]
fn package_sub_paths_and_scoped_packages() {
    let graph = ModuleGraph::new();
    let resolver = Resolver::new(config());
    let main = app_main(&graph, &resolver);

    let string = resolver.resolve(&graph, &main, "lively.lang/string.js").unwrap();
    assert_eq!(string.module.as_str(), "local://lively.lang@2.1.0/string.js");
    assert!(!string.is_package_import);

    let kit = resolver.resolve(&graph, &main, "@scope/kit").unwrap();
    assert_eq!(kit.module.as_str(), "local://@scope/kit@0.3.0/index.js");
    assert!(kit.is_package_import);

    let part = resolver.resolve(&graph, &main, "@scope/kit/parts/a.js").unwrap();
    assert_eq!(part.module.as_str(), "local://@scope/kit@0.3.0/parts/a.js");
    assert!(!part.is_package_import);
    assert_eq!(graph.package("@scope/kit").unwrap().modules.len(), 2);
}

#[test]
fn excluded_alias_resolves_to_empty() {
    let graph = ModuleGraph::new();
    let resolver = Resolver::new(config());
    let main = app_main(&graph, &resolver);

    let fs = resolver.resolve(&graph, &main, "fs").unwrap();
    assert!(fs.module.is_empty_module());
    assert_eq!(graph.kind(&fs.module), Some(ModuleKind::Empty));

    let literal = resolver.resolve(&graph, &main, "@empty").unwrap();
    assert_eq!(literal.module, fs.module);
    assert!(!literal.created);
}

#[test]
fn relative_alias_joins_package_root() {
    let graph = ModuleGraph::new();
    let resolver = Resolver::new(config());
    let main = app_main(&graph, &resolver);

    let jquery = resolver.resolve(&graph, &main, "jquery").unwrap();
    assert_eq!(jquery.module.as_str(), "http://localhost:9011/app/vendor/jquery.js");
    assert_eq!(graph.kind(&jquery.module), Some(ModuleKind::Standalone));

    // with the base url configured, the host's own scripts become local ids
    let mut config = config();
    config.settings.base_url = "http://localhost:9011/".into();
    let graph = ModuleGraph::new();
    let resolver = Resolver::new(config);
    let main = app_main(&graph, &resolver);

    let jquery = resolver.resolve(&graph, &main, "jquery").unwrap();
    assert_eq!(jquery.module.as_str(), "local://app/vendor/jquery.js");
    assert_eq!(graph.module(&jquery.module).unwrap().name, "jquery");
}

#[test]
fn specifier_alias_and_unknown_packages_become_standalone() {
    let graph = ModuleGraph::new();
    let resolver = Resolver::new(config());
    let main = app_main(&graph, &resolver);

    let lodash = resolver.resolve(&graph, &main, "lodash").unwrap();
    assert_eq!(lodash.module.as_str(), "local://lodash-es");
    assert_eq!(graph.kind(&lodash.module), Some(ModuleKind::Standalone));

    let unknown = resolver.resolve(&graph, &main, "left-pad").unwrap();
    assert_eq!(unknown.module.as_str(), "local://left-pad");
    assert!(unknown.is_package_import);
    assert!(graph.module(&unknown.module).unwrap().package.is_none());

    let file = resolver.resolve(&graph, &main, "left-pad/lib/pad.js").unwrap();
    assert_eq!(file.module.as_str(), "local://left-pad/lib/pad.js");
    assert!(!file.is_package_import);
}

#[test]
fn urls_are_kept_verbatim() {
    let graph = ModuleGraph::new();
    let resolver = Resolver::new(config());
    let main = app_main(&graph, &resolver);

    let cdn = resolver.resolve(&graph, &main, "https://cdn.example.com/x.js").unwrap();
    assert_eq!(cdn.module.as_str(), "https://cdn.example.com/x.js");
    assert_eq!(graph.kind(&cdn.module), Some(ModuleKind::Standalone));
    assert!(!cdn.is_package_import);
}

#[test]
fn relative_import_without_package_fails() {
    let graph = ModuleGraph::new();
    let resolver = Resolver::new(config());
    let script = resolver.resolve_entry(&graph, "left-pad").unwrap().module;

    let err = resolver.resolve(&graph, &script, "./helper.js").unwrap_err();
    assert!(matches!(
        err,
        ResolutionError::NoPackageContext { ref referrer, ref specifier }
            if *referrer == script && specifier == "./helper.js"
    ));
}

#[test]
fn unknown_referrer_and_relative_entries_fail() {
    let graph = ModuleGraph::new();
    let resolver = Resolver::new(config());

    let ghost = ModuleId::in_package("app", "1.0.0", "/ghost.js");
    assert!(matches!(
        resolver.resolve(&graph, &ghost, "lively.lang"),
        Err(ResolutionError::UnknownReferrer(_))
    ));
    assert!(matches!(
        resolver.resolve_entry(&graph, "./main.js"),
        Err(ResolutionError::RelativeEntry(_))
    ));
}

#[test]
fn resolve_module_records_edges_once() {
    let builder = GraphBuilder::new(config(), MemorySource::new());
    let main = builder.resolve_entry("app").unwrap();

    let util = builder.resolve_module(&main, "./util.js").unwrap();
    let again = builder.resolve_module(&main, "./util.js").unwrap();
    assert_eq!(util, again);

    let graph = builder.graph();
    assert_eq!(graph.dependencies(&main), vec![util.clone()]);
    assert_eq!(graph.dependents(&util), vec![main.clone()]);
    assert!(!graph.module(&main).unwrap().dependencies[&util].is_package_import);
}

#[test]
fn standalone_metadata_dependencies() {
    let config = config().with_standalone(
        "local://vendor/plugin.js",
        StandaloneSpec {
            deps: vec!["./base.js".into(), "../shared/util.js".into()],
        },
    );
    let builder = GraphBuilder::new(config, MemorySource::new());
    let graph = builder.graph();

    let plugin = builder.resolve_entry("vendor/plugin.js").unwrap();
    assert_eq!(plugin.as_str(), "local://vendor/plugin.js");

    let deps = builder.resolve_imports(&plugin).unwrap();
    let deps: Vec<_> = deps.iter().map(ModuleId::as_str).collect();
    assert_eq!(deps, vec!["local://vendor/base.js", "local://shared/util.js"]);

    let record = graph.module(&plugin).unwrap();
    assert!(record.is_resolved());
    assert!(record.dependencies.values().all(|edge| edge.is_package_import && edge.bindings.is_empty()));
    assert_eq!(graph.kind(&ModuleId::standalone("vendor/base.js")), Some(ModuleKind::Standalone));
}

#[test]
fn standalone_referrer_bare_imports_have_no_aliases() {
    let graph = ModuleGraph::new();
    graph.add_module(ModuleRecord::builder(ModuleId::standalone("vendor/x.js"), ModuleKind::Standalone).build());
    let resolver = Resolver::new(config());

    // `jquery` is only aliased inside `app`
    let resolved = resolver
        .resolve(&graph, &ModuleId::standalone("vendor/x.js"), "jquery")
        .unwrap();
    assert_eq!(resolved.module.as_str(), "local://jquery");
}

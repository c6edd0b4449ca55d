//! Graph construction: fetch, parse and resolve module by module.

use std::collections::VecDeque;
use std::sync::Arc;

use freezer_config::FreezerConfig;
use indexmap::IndexMap;
use rustc_hash::FxHashSet as HashSet;

use crate::binding::{Binding, DependencyEdge};
use crate::collection::{
    CollectedExport, ImportedBinding, JsonParser, ModuleParser, OxcParser, ParsedModule,
};
use crate::error::{Error, Result};
use crate::host::HostNormalizer;
use crate::memory::ModuleGraph;
use crate::module::{ModuleKind, ResolutionState};
use crate::module_id::ModuleId;
use crate::resolver::Resolver;
use crate::source::SourceProvider;

/// A module whose source could not be fetched, parsed or resolved.
#[derive(Debug)]
pub struct ModuleFailure {
    pub id: ModuleId,
    pub error: Error,
}

/// Summary of a whole-graph build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub entries: Vec<ModuleId>,
    /// Modules whose imports were discovered, in processing order.
    pub resolved: Vec<ModuleId>,
    pub failures: Vec<ModuleFailure>,
    /// Entry specifiers that didn't resolve to any module.
    pub unresolved_entries: Vec<(String, Error)>,
}

impl BuildReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty() && self.unresolved_entries.is_empty()
    }
}

/// Builds a [`ModuleGraph`] from entry specifiers.
///
/// Source modules are fetched through the [`SourceProvider`] and parsed by
/// the [`ModuleParser`] (oxc by default); JSON modules are parsed as
/// documents; standalone scripts only contribute their configured metadata
/// dependencies.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    graph: ModuleGraph,
    resolver: Resolver,
    source: Arc<dyn SourceProvider>,
    parser: Arc<dyn ModuleParser>,
}

impl GraphBuilder {
    pub fn new(config: FreezerConfig, source: impl SourceProvider + 'static) -> Self {
        Self {
            graph: ModuleGraph::new(),
            resolver: Resolver::new(config),
            source: Arc::new(source),
            parser: Arc::new(OxcParser),
        }
    }

    /// Build into an existing graph instead of a fresh one.
    pub fn with_graph(mut self, graph: ModuleGraph) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_parser(mut self, parser: impl ModuleParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    pub fn with_normalizer(mut self, normalizer: impl HostNormalizer + 'static) -> Self {
        self.resolver = self.resolver.with_normalizer(normalizer);
        self
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn into_graph(self) -> ModuleGraph {
        self.graph
    }

    /// Resolve an entry specifier to a module without discovering its imports.
    pub fn resolve_entry(&self, specifier: &str) -> Result<ModuleId> {
        let resolved = self.resolver.resolve_entry(&self.graph, specifier)?;
        Ok(resolved.module)
    }

    /// Resolve `specifier` as imported by `referrer` and record the edge.
    pub fn resolve_module(&self, referrer: &ModuleId, specifier: &str) -> Result<ModuleId> {
        self.link(referrer, specifier, Vec::new())
    }

    fn link(&self, referrer: &ModuleId, specifier: &str, bindings: Vec<Binding>) -> Result<ModuleId> {
        let resolved = self.resolver.resolve(&self.graph, referrer, specifier)?;
        let edge = DependencyEdge::new(bindings, resolved.is_package_import);
        self.graph.add_dependency(referrer, &resolved.module, edge)?;
        Ok(resolved.module)
    }

    /// Discover the imports of one module, resolving each to a record.
    ///
    /// Runs once per successfully resolved module; later calls return the
    /// known dependencies. A fetch or parse failure marks the module
    /// `Failed`, and the next call tries again.
    pub fn resolve_imports(&self, id: &ModuleId) -> Result<Vec<ModuleId>> {
        let kind = self
            .graph
            .kind(id)
            .ok_or_else(|| Error::UnknownModule(id.clone()))?;

        match self.graph.resolution(id) {
            Some(ResolutionState::Unresolved | ResolutionState::Failed) => {}
            _ => return Ok(self.graph.dependencies(id)),
        }
        self.graph.set_resolution(id, ResolutionState::Resolving)?;

        let outcome = match kind {
            ModuleKind::Source => self.resolve_source(id),
            ModuleKind::Json => self.resolve_json(id),
            ModuleKind::Standalone => self.resolve_standalone(id),
            ModuleKind::Empty => Ok(()),
        };

        match outcome {
            Ok(()) => {
                self.graph.set_resolution(id, ResolutionState::Resolved)?;
                Ok(self.graph.dependencies(id))
            }
            Err(error) => {
                tracing::warn!(module = %id, %error, "failed to resolve module");
                self.graph.set_resolution(id, ResolutionState::Failed)?;
                Err(error)
            }
        }
    }

    fn resolve_source(&self, id: &ModuleId) -> Result<()> {
        let source = self.source.fetch_source(id)?;
        let parsed = self.parser.parse(id, &source)?;

        for (specifier, bindings) in group_bindings(&parsed) {
            self.link(id, &specifier, bindings)?;
        }
        self.graph.set_exports(id, parsed.export_entries())
    }

    fn resolve_json(&self, id: &ModuleId) -> Result<()> {
        let source = self.source.fetch_source(id)?;
        let parsed = JsonParser.parse(id, &source)?;
        self.graph.set_exports(id, parsed.export_entries())
    }

    fn resolve_standalone(&self, id: &ModuleId) -> Result<()> {
        for dependency in self.resolver.standalone_dependencies(id) {
            let resolved = self
                .resolver
                .resolve_standalone_dependency(&self.graph, id, dependency);
            self.graph
                .add_dependency(id, &resolved.module, DependencyEdge::new(Vec::new(), true))?;
        }
        Ok(())
    }

    /// Resolve `entries` and everything reachable from them.
    ///
    /// Failures are collected per module; unrelated modules still resolve.
    pub fn build<I, S>(&self, entries: I) -> BuildReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BuildReport::default();
        let mut queue = VecDeque::new();

        for entry in entries {
            let entry = entry.as_ref();
            match self.resolve_entry(entry) {
                Ok(id) => {
                    report.entries.push(id.clone());
                    queue.push_back(id);
                }
                Err(error) => {
                    tracing::warn!(entry, %error, "failed to resolve entry");
                    report.unresolved_entries.push((entry.to_string(), error));
                }
            }
        }

        let mut visited = HashSet::default();
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id.clone()) {
                continue;
            }

            match self.resolve_imports(&id) {
                Ok(dependencies) => {
                    report.resolved.push(id);
                    queue.extend(dependencies.into_iter().filter(|dep| !visited.contains(dep)));
                }
                Err(error) => report.failures.push(ModuleFailure { id, error }),
            }
        }

        tracing::info!(
            modules = self.graph.len(),
            resolved = report.resolved.len(),
            failures = report.failures.len(),
            "built module graph"
        );
        report
    }
}

/// Bindings per specifier, in order of first appearance; imports come
/// before re-exports.
fn group_bindings(parsed: &ParsedModule) -> IndexMap<String, Vec<Binding>> {
    let mut groups: IndexMap<String, Vec<Binding>> = IndexMap::new();

    for import in &parsed.imports {
        let bindings = groups.entry(import.specifier.clone()).or_default();
        let binding = match &import.binding {
            ImportedBinding::SideEffect => continue,
            ImportedBinding::Named { imported, local } => Binding::named(imported, local),
            ImportedBinding::Default { local } => Binding::default_import(local),
            ImportedBinding::Namespace { local } => Binding::namespace(local),
        };
        bindings.push(binding);
    }

    for export in &parsed.exports {
        let (specifier, binding) = match export {
            CollectedExport::Local { .. } => continue,
            CollectedExport::ReExport {
                specifier,
                imported,
                exported,
            } => (specifier, Binding::re_export(imported, exported)),
            CollectedExport::Star { specifier } => (specifier, Binding::star_reexport()),
            CollectedExport::Namespace {
                specifier,
                exported,
            } => (specifier, Binding::namespace_reexport(exported)),
        };
        groups.entry(specifier.clone()).or_default().push(binding);
    }

    groups
}

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::binding::DependencyEdge;
use crate::export::ExportEntry;
use crate::module_id::ModuleId;

/// What kind of artifact a module is. Closed set, dispatched with `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// ECMAScript module source, parsed for imports and exports.
    Source,
    /// JSON document exposing `default` plus its top-level keys.
    Json,
    /// Opaque script loaded as-is (CDN url, vendored global script).
    Standalone,
    /// Shared placeholder for excluded dependencies.
    Empty,
}

impl ModuleKind {
    /// Kind of a package file, chosen by extension.
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".json") {
            ModuleKind::Json
        } else {
            ModuleKind::Source
        }
    }

    /// Opaque modules are loaded before any package and never grouped.
    pub fn is_global(self) -> bool {
        matches!(self, ModuleKind::Standalone | ModuleKind::Empty)
    }
}

/// Progress of import discovery for a module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionState {
    #[default]
    Unresolved,
    Resolving,
    Resolved,
    /// Fetching or parsing the module failed.
    Failed,
}

/// A node of the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub id: ModuleId,
    /// Path inside the package (`/lib/x.js`) or the specifier that produced
    /// a package-less module.
    pub name: String,
    pub kind: ModuleKind,
    pub package: Option<String>,
    /// Outgoing edges in declaration order.
    pub dependencies: IndexMap<ModuleId, DependencyEdge>,
    /// Derived from every other record's `dependencies`; maintained by the graph.
    pub dependents: IndexSet<ModuleId>,
    pub exports: Vec<ExportEntry>,
    pub resolution: ResolutionState,
}

impl ModuleRecord {
    pub fn builder(id: ModuleId, kind: ModuleKind) -> ModuleBuilder {
        let name = id.location().to_string();
        ModuleBuilder {
            record: Self {
                id,
                name,
                kind,
                package: None,
                dependencies: IndexMap::new(),
                dependents: IndexSet::new(),
                exports: Vec::new(),
                resolution: ResolutionState::Unresolved,
            },
        }
    }

    /// The shared `@empty` module.
    pub fn empty() -> Self {
        Self::builder(ModuleId::empty(), ModuleKind::Empty)
            .resolution(ResolutionState::Resolved)
            .build()
    }

    pub fn is_global(&self) -> bool {
        self.kind.is_global()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution == ResolutionState::Resolved
    }

    pub fn dependency_ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.dependencies.keys()
    }

    /// Position of `dependency` among this module's edges.
    pub fn dependency_index(&self, dependency: &ModuleId) -> Option<usize> {
        self.dependencies.get_index_of(dependency)
    }

    pub fn exports_iter(&self) -> impl Iterator<Item = &ExportEntry> {
        self.exports.iter()
    }

    /// Whether the module defines `name` itself (not through a re-export).
    pub fn defines_export(&self, name: &str) -> bool {
        self.exports
            .iter()
            .any(|export| export.is_local() && export.exported == name)
    }
}

/// Builder for `ModuleRecord` to avoid long argument lists in constructors.
#[derive(Debug)]
pub struct ModuleBuilder {
    record: ModuleRecord,
}

impl ModuleBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.record.name = name.into();
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.record.package = Some(package.into());
        self
    }

    pub fn exports(mut self, exports: Vec<ExportEntry>) -> Self {
        self.record.exports = exports;
        self
    }

    pub fn resolution(mut self, state: ResolutionState) -> Self {
        self.record.resolution = state;
        self
    }

    pub fn build(self) -> ModuleRecord {
        self.record
    }
}

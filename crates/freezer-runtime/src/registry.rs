//! Execution state for the modules of one graph.

use freezer_config::{FreezerConfig, Settings};
use freezer_graph::{LoadPlan, ModuleGraph, ModuleId, ModuleRecord, PlanOptions};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;

use crate::body::ModuleBody;
use crate::error::{Result, RuntimeError};
use crate::namespace::Namespace;

/// Per-module execution state. A failed execution returns to `NotExecuted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ExecState {
    #[default]
    NotExecuted,
    Executing,
    Executed,
}

#[derive(Debug, Default)]
pub(crate) struct RuntimeModule {
    pub(crate) state: ExecState,
    pub(crate) namespace: Namespace,
    pub(crate) body: Option<ModuleBody>,
    pub(crate) last_error: Option<String>,
    pub(crate) global: bool,
}

impl RuntimeModule {
    fn provided() -> Self {
        Self {
            state: ExecState::Executed,
            global: true,
            ..Self::default()
        }
    }
}

/// Read-only view of a module's graph record and runtime state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedModule {
    pub id: ModuleId,
    /// `None` for host globals that aren't part of the graph.
    pub record: Option<ModuleRecord>,
    pub state: ExecState,
    pub exports: IndexMap<String, Value>,
    pub last_error: Option<String>,
    pub registered: bool,
    pub global: bool,
}

/// Holds module bodies and namespaces and drives loading.
///
/// Created per graph; there is no process-wide registry.
#[derive(Debug)]
pub struct Registry {
    pub(crate) graph: ModuleGraph,
    pub(crate) settings: Settings,
    pub(crate) modules: IndexMap<ModuleId, RuntimeModule>,
    pub(crate) globals: IndexSet<ModuleId>,
}

impl Registry {
    pub fn new(graph: ModuleGraph) -> Self {
        Self::with_settings(graph, Settings::default())
    }

    /// Registry whose host globals and attempt limit come from `settings`.
    pub fn with_settings(graph: ModuleGraph, settings: Settings) -> Self {
        let mut registry = Self {
            graph,
            settings,
            modules: IndexMap::new(),
            globals: IndexSet::new(),
        };

        registry
            .modules
            .insert(ModuleId::empty(), RuntimeModule::provided());

        let configured: Vec<ModuleId> = registry
            .settings
            .globals
            .iter()
            .filter_map(|id| match ModuleId::new(id.as_str()) {
                Ok(id) => Some(id),
                Err(err) => {
                    tracing::warn!(global = %id, "ignoring host global: {err}");
                    None
                }
            })
            .collect();
        for id in configured {
            registry.mark_global(id);
        }

        registry
    }

    pub fn from_config(graph: ModuleGraph, config: &FreezerConfig) -> Self {
        Self::with_settings(graph, config.settings.clone())
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Attach a body to a graph module.
    ///
    /// A body must have no setters or exactly one per dependency edge.
    /// Registering again replaces the body and makes the module pending.
    pub fn register(&mut self, id: &ModuleId, body: ModuleBody) -> Result<()> {
        let record = self
            .graph
            .module(id)
            .ok_or_else(|| RuntimeError::UnknownModule(id.clone()))?;

        let expected = record.dependencies.len();
        let actual = body.setter_count();
        if actual != 0 && actual != expected {
            return Err(RuntimeError::SetterCountMismatch {
                id: id.clone(),
                expected,
                actual,
            });
        }

        let module = self.modules.entry(id.clone()).or_default();
        module.body = Some(body);
        module.state = ExecState::NotExecuted;
        module.last_error = None;
        tracing::debug!(module = %id, setters = actual, "registered module body");
        Ok(())
    }

    /// Make a host-provided module available. It counts as executed and
    /// satisfies every edge into it.
    pub fn provide_global<I>(&mut self, id: &ModuleId, exports: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let module = self.mark_global(id.clone());
        module.namespace.export_all(exports);
    }

    fn mark_global(&mut self, id: ModuleId) -> &mut RuntimeModule {
        self.globals.insert(id.clone());
        let module = self.modules.entry(id).or_default();
        module.state = ExecState::Executed;
        module.global = true;
        module
    }

    /// Load plan for `root` with host globals pre-satisfied.
    pub fn compute_load_plan(&self, root: &ModuleId) -> LoadPlan {
        let options = PlanOptions::new()
            .root(root.clone())
            .pre_satisfied(self.globals.iter().cloned());
        self.graph.compute_load_plan(&options)
    }

    pub fn state(&self, id: &ModuleId) -> ExecState {
        self.modules
            .get(id)
            .map(|module| module.state)
            .unwrap_or_default()
    }

    pub fn is_executed(&self, id: &ModuleId) -> bool {
        self.state(id) == ExecState::Executed
    }

    pub fn is_registered(&self, id: &ModuleId) -> bool {
        self.modules
            .get(id)
            .is_some_and(|module| module.body.is_some())
    }

    /// Live namespace handle of a known module.
    pub fn namespace(&self, id: &ModuleId) -> Option<Namespace> {
        self.modules.get(id).map(|module| module.namespace.clone())
    }

    pub fn get_module(&self, id: &ModuleId) -> Option<LoadedModule> {
        let record = self.graph.module(id);
        let module = self.modules.get(id);
        if record.is_none() && module.is_none() {
            return None;
        }

        Some(LoadedModule {
            id: id.clone(),
            record,
            state: module.map(|m| m.state).unwrap_or_default(),
            exports: module.map(|m| m.namespace.entries()).unwrap_or_default(),
            last_error: module.and_then(|m| m.last_error.clone()),
            registered: module.is_some_and(|m| m.body.is_some()),
            global: module.is_some_and(|m| m.global),
        })
    }

    /// Graph modules in insertion order, then host globals outside the graph.
    pub fn all_modules(&self) -> Vec<LoadedModule> {
        let mut ids: IndexSet<ModuleId> = self.graph.module_ids().into_iter().collect();
        ids.extend(self.globals.iter().cloned());
        ids.iter().filter_map(|id| self.get_module(id)).collect()
    }

    /// Namespace of `id`, creating an empty pending entry for modules that
    /// have no runtime state yet.
    pub(crate) fn namespace_handle(&mut self, id: &ModuleId) -> Namespace {
        self.modules
            .entry(id.clone())
            .or_default()
            .namespace
            .clone()
    }
}

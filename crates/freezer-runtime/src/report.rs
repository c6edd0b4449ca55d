use freezer_graph::ModuleId;
use serde::Serialize;

/// Why a module was still not executed when loading stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PendingReason {
    /// The module is in the plan but has no body.
    NotRegistered,
    /// Its last execution attempt failed.
    Failed { message: String },
    /// The attempt limit ran out before the module was tried.
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub module: ModuleId,
    #[serde(flatten)]
    pub reason: PendingReason,
}

/// Outcome of [`Registry::load`](crate::Registry::load).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub root: ModuleId,
    /// Modules executed by this call, in execution order.
    pub executed: Vec<ModuleId>,
    /// Planned modules that are not executed, in plan order.
    pub still_pending: Vec<ModuleId>,
    /// One entry per still-pending module.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of passes over the plan.
    pub attempts: u32,
    /// Modules the scheduler placed without all dependencies before them.
    pub unresolved: Vec<ModuleId>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.still_pending.is_empty()
    }

    pub fn diagnostic(&self, id: &ModuleId) -> Option<&PendingReason> {
        self.diagnostics
            .iter()
            .find(|diagnostic| &diagnostic.module == id)
            .map(|diagnostic| &diagnostic.reason)
    }
}

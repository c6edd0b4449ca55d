//! Bounded-retry module loading.
//!
//! Each pass walks the load plan and runs every module that has a body and
//! hasn't executed yet. A failed execution leaves the module pending for the
//! next pass; passes stop when nothing runnable is left or the attempt
//! limit is reached. Cyclic modules that read a dependency too early
//! typically succeed on the second pass.

use freezer_graph::{Binding, ModuleId};
use rustc_hash::FxHashSet;

use crate::error::{Result, RuntimeError};
use crate::namespace::Namespace;
use crate::registry::{ExecState, Registry};
use crate::report::{Diagnostic, LoadReport, PendingReason};

impl Registry {
    /// Execute `root` and everything it depends on.
    ///
    /// Modules already executed by an earlier load are not run again.
    /// Failures never surface as errors; modules that stay pending are
    /// listed in the report.
    pub fn load(&mut self, root: &ModuleId) -> Result<LoadReport> {
        if !self.graph.contains(root) {
            return Err(RuntimeError::UnknownModule(root.clone()));
        }

        let plan = self.compute_load_plan(root);
        let max_attempts = self.settings.max_attempts.max(1);
        let mut executed = Vec::new();
        let mut attempts = 0;

        while attempts < max_attempts {
            let runnable: Vec<ModuleId> = plan
                .iter()
                .filter(|id| self.is_runnable(id))
                .cloned()
                .collect();
            if runnable.is_empty() {
                break;
            }

            attempts += 1;
            tracing::debug!(
                root = %root,
                attempt = attempts,
                runnable = runnable.len(),
                "load pass"
            );

            for id in &runnable {
                if self.run_module(id) {
                    executed.push(id.clone());
                }
            }
        }

        let still_pending: Vec<ModuleId> = plan
            .iter()
            .filter(|id| !self.is_executed(id))
            .cloned()
            .collect();
        let diagnostics = still_pending
            .iter()
            .map(|id| Diagnostic {
                module: id.clone(),
                reason: self.pending_reason(id),
            })
            .collect();

        if still_pending.is_empty() {
            tracing::info!(
                root = %root,
                executed = executed.len(),
                attempts,
                "load complete"
            );
        } else {
            tracing::warn!(
                root = %root,
                pending = still_pending.len(),
                attempts,
                "modules still pending after load"
            );
        }

        Ok(LoadReport {
            root: root.clone(),
            executed,
            still_pending,
            diagnostics,
            attempts,
            unresolved: plan.unresolved_modules,
        })
    }

    fn is_runnable(&self, id: &ModuleId) -> bool {
        self.modules
            .get(id)
            .is_some_and(|module| module.body.is_some() && module.state != ExecState::Executed)
    }

    fn pending_reason(&self, id: &ModuleId) -> PendingReason {
        match self.modules.get(id) {
            Some(module) if module.body.is_some() => match &module.last_error {
                Some(message) => PendingReason::Failed {
                    message: message.clone(),
                },
                None => PendingReason::NotAttempted,
            },
            _ => PendingReason::NotRegistered,
        }
    }

    /// One execution attempt. Returns whether the module is now executed.
    fn run_module(&mut self, id: &ModuleId) -> bool {
        self.update_imports(id);
        self.propagate_reexports(id);

        let exports = self.namespace_handle(id);
        let Some(module) = self.modules.get_mut(id) else {
            return false;
        };
        let Some(body) = module.body.as_mut() else {
            return false;
        };

        module.state = ExecState::Executing;
        let outcome = body.run(&exports);
        let succeeded = match outcome {
            Ok(()) => {
                module.state = ExecState::Executed;
                module.last_error = None;
                tracing::debug!(module = %id, "executed");
                true
            }
            Err(err) => {
                module.state = ExecState::NotExecuted;
                tracing::debug!(module = %id, error = %err, "execution failed, will retry");
                module.last_error = Some(err.to_string());
                false
            }
        };

        self.propagate_reexports(id);
        self.update_dependents(id, &mut FxHashSet::default());
        succeeded
    }

    /// Hand every dependency's current namespace to the matching setter.
    fn update_imports(&mut self, id: &ModuleId) {
        let Some(record) = self.graph.module(id) else {
            return;
        };

        let imports: Vec<(usize, Namespace)> = record
            .dependency_ids()
            .enumerate()
            .filter(|(_, dependency)| !dependency.is_empty_module())
            .map(|(index, dependency)| (index, self.namespace_handle(dependency)))
            .collect();

        if let Some(body) = self
            .modules
            .get_mut(id)
            .and_then(|module| module.body.as_mut())
        {
            for (index, namespace) in &imports {
                body.update(*index, namespace);
            }
        }
    }

    /// Copy re-exported bindings from dependencies into `id`'s namespace.
    fn propagate_reexports(&mut self, id: &ModuleId) {
        let Some(record) = self.graph.module(id) else {
            return;
        };
        let exports = self.namespace_handle(id);

        for (dependency, edge) in &record.dependencies {
            if dependency.is_empty_module() || !edge.has_reexports() {
                continue;
            }
            let source = self.namespace_handle(dependency);

            for binding in edge.reexports() {
                copy_reexport(binding, &source, &exports, |name| record.defines_export(name));
            }
        }
    }

    /// Re-run the setters dependents hold for `id`. Dependents that
    /// re-export from `id` pass the change on to their own dependents.
    fn update_dependents(&mut self, id: &ModuleId, visited: &mut FxHashSet<ModuleId>) {
        if !visited.insert(id.clone()) {
            return;
        }
        let namespace = self.namespace_handle(id);

        for dependent in self.graph.dependents(id) {
            let Some(record) = self.graph.module(&dependent) else {
                continue;
            };
            let Some(index) = record.dependency_index(id) else {
                continue;
            };

            if let Some(body) = self
                .modules
                .get_mut(&dependent)
                .and_then(|module| module.body.as_mut())
            {
                body.update(index, &namespace);
            }

            let reexports = record
                .dependencies
                .get(id)
                .is_some_and(|edge| edge.has_reexports());
            if reexports {
                self.propagate_reexports(&dependent);
                self.update_dependents(&dependent, visited);
            }
        }
    }
}

fn copy_reexport<F>(binding: &Binding, source: &Namespace, target: &Namespace, defines_locally: F)
where
    F: Fn(&str) -> bool,
{
    if binding.is_star_reexport() {
        for (name, value) in source.entries() {
            if name != "default" && !defines_locally(&name) {
                target.set(name, value);
            }
        }
        return;
    }

    let Some(exported) = binding.exported.as_deref() else {
        return;
    };
    if binding.is_namespace {
        target.set(exported, source.to_value());
    } else if let Some(value) = binding.imported.as_deref().and_then(|name| source.get(name)) {
        target.set(exported, value);
    }
}

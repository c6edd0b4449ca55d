//! Mutation operations for ModuleGraph.

use super::graph::{GraphInner, ModuleGraph};
use crate::binding::DependencyEdge;
use crate::error::{Error, Result};
use crate::export::ExportEntry;
use crate::module::{ModuleRecord, ResolutionState};
use crate::module_id::ModuleId;
use crate::package::Package;

impl ModuleGraph {
    /// Add a module. An id already in the graph keeps its existing record.
    ///
    /// Returns `true` if the record was inserted.
    pub fn add_module(&self, record: ModuleRecord) -> bool {
        let mut inner = self.inner.write();
        insert_record(&mut inner, record)
    }

    /// Look up `id`, creating its record with `make` if it is missing.
    ///
    /// Lookup and insertion happen under one write lock. Returns whether the
    /// record was created.
    pub fn get_or_insert_with<F>(&self, id: &ModuleId, make: F) -> bool
    where
        F: FnOnce() -> ModuleRecord,
    {
        let mut inner = self.inner.write();
        if inner.modules.contains_key(id) {
            return false;
        }
        let record = make();
        debug_assert_eq!(&record.id, id);
        insert_record(&mut inner, record)
    }

    /// Register a package. An already known package is left untouched.
    pub fn add_package(&self, package: Package) -> bool {
        let mut inner = self.inner.write();
        if inner.packages.contains_key(&package.name) {
            return false;
        }
        tracing::debug!(package = %package.name, version = %package.version, "registered package");
        inner.packages.insert(package.name.clone(), package);
        true
    }

    /// Record that `from` depends on `to`.
    ///
    /// Repeating an edge merges any new bindings into it rather than adding a
    /// second one; self-edges are dropped. Returns `true` if a new edge was
    /// created.
    pub fn add_dependency(&self, from: &ModuleId, to: &ModuleId, edge: DependencyEdge) -> Result<bool> {
        let mut inner = self.inner.write();
        if !inner.modules.contains_key(to) {
            return Err(Error::UnknownModule(to.clone()));
        }
        let record = inner
            .modules
            .get_mut(from)
            .ok_or_else(|| Error::UnknownModule(from.clone()))?;

        if from == to {
            return Ok(false);
        }

        if let Some(existing) = record.dependencies.get_mut(to) {
            existing.merge(edge.bindings);
            existing.is_package_import |= edge.is_package_import;
            return Ok(false);
        }

        record.dependencies.insert(to.clone(), edge);
        inner.dirty = true;
        Ok(true)
    }

    pub fn set_resolution(&self, id: &ModuleId, state: ResolutionState) -> Result<()> {
        let mut inner = self.inner.write();
        let record = inner
            .modules
            .get_mut(id)
            .ok_or_else(|| Error::UnknownModule(id.clone()))?;
        record.resolution = state;
        Ok(())
    }

    pub fn set_exports(&self, id: &ModuleId, exports: Vec<ExportEntry>) -> Result<()> {
        let mut inner = self.inner.write();
        let record = inner
            .modules
            .get_mut(id)
            .ok_or_else(|| Error::UnknownModule(id.clone()))?;
        record.exports = exports;
        Ok(())
    }
}

fn insert_record(inner: &mut GraphInner, mut record: ModuleRecord) -> bool {
    if inner.modules.contains_key(&record.id) {
        return false;
    }

    let id = record.id.clone();
    record.dependencies.shift_remove(&id);
    // dependents are derived; anything supplied by the caller is replaced
    record.dependents.clear();

    if let Some(name) = &record.package {
        let package = inner.packages.entry(name.clone()).or_insert_with(|| {
            let version = id
                .package_parts()
                .map_or("0.0.0", |(_, version, _)| version);
            Package::new(name.clone(), version, freezer_config::DEFAULT_MAIN)
        });
        package.modules.insert(id.clone());
    }

    tracing::trace!(module = %id, kind = ?record.kind, "added module");
    inner.modules.insert(id, record);
    inner.dirty = true;
    true
}

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::module_id::ModuleId;

/// A package as seen by the graph: the modules resolved into it so far.
///
/// Created the first time one of its modules is resolved and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    /// Location relative alias targets are joined onto.
    pub root_url: String,
    /// Modules in resolution order.
    pub modules: IndexSet<ModuleId>,
    pub entry_point: ModuleId,
    pub excluded: bool,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>, entry_path: &str) -> Self {
        let name = name.into();
        let version = version.into();
        let entry_point = ModuleId::in_package(&name, &version, entry_path);
        Self {
            root_url: name.clone(),
            name,
            version,
            modules: IndexSet::new(),
            entry_point,
            excluded: false,
        }
    }

    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = root_url.into();
        self
    }

    pub fn excluded(mut self, excluded: bool) -> Self {
        self.excluded = excluded;
        self
    }

    /// Id of the file at `path` inside this package.
    pub fn module_id(&self, path: &str) -> ModuleId {
        ModuleId::in_package(&self.name, &self.version, path)
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.modules.contains(id)
    }
}

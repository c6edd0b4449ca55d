//! Source providers: where module text comes from.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

use crate::error::SourceError;
use crate::module_id::ModuleId;

/// Supplies the source text of a module by id.
pub trait SourceProvider: Send + Sync + fmt::Debug {
    fn fetch_source(&self, id: &ModuleId) -> Result<String, SourceError>;
}

impl<T: SourceProvider + ?Sized> SourceProvider for Arc<T> {
    fn fetch_source(&self, id: &ModuleId) -> Result<String, SourceError> {
        (**self).fetch_source(id)
    }
}

/// In-memory sources, keyed by module id.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<HashMap<ModuleId, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, id: ModuleId, source: impl Into<String>) -> Self {
        self.insert(id, source);
        self
    }

    pub fn insert(&self, id: ModuleId, source: impl Into<String>) {
        self.files.write().insert(id, source.into());
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl SourceProvider for MemorySource {
    fn fetch_source(&self, id: &ModuleId) -> Result<String, SourceError> {
        self.files
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.clone()))
    }
}

/// Reads sources from disk.
///
/// Package modules are looked up under their registered package directory
/// (default `<root>/<package>`); `local://` standalone ids resolve under the
/// root. Remote URLs are never fetched.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    package_dirs: HashMap<String, PathBuf>,
}

impl FsSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            package_dirs: HashMap::default(),
        }
    }

    pub fn package_dir(mut self, package: impl Into<String>, dir: impl AsRef<Path>) -> Self {
        self.package_dirs
            .insert(package.into(), dir.as_ref().to_path_buf());
        self
    }

    /// Filesystem location of a module, if it has one.
    pub fn path_of(&self, id: &ModuleId) -> Option<PathBuf> {
        if let Some((package, _, path)) = id.package_parts() {
            let dir = self
                .package_dirs
                .get(package)
                .cloned()
                .unwrap_or_else(|| self.root.join(package));
            return Some(dir.join(path.trim_start_matches('/')));
        }

        let local = id.as_str().strip_prefix(crate::LOCAL_SCHEME)?;
        Some(self.root.join(local.trim_start_matches('/')))
    }
}

impl SourceProvider for FsSource {
    fn fetch_source(&self, id: &ModuleId) -> Result<String, SourceError> {
        let path = self
            .path_of(id)
            .ok_or_else(|| SourceError::NotFound(id.clone()))?;

        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(id.clone()),
            _ => SourceError::Io {
                id: id.clone(),
                source,
            },
        })
    }
}

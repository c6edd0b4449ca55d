//! Mapping `(referrer, specifier)` pairs onto module records.

use std::sync::Arc;

use freezer_config::{AliasResolution, FreezerConfig};

use crate::error::ResolutionError;
use crate::host::{BaseUrlNormalizer, HostNormalizer};
use crate::memory::ModuleGraph;
use crate::module::{ModuleKind, ModuleRecord};
use crate::module_id::ModuleId;
use crate::package::Package;
use crate::specifier::{Specifier, join_path, parent_dir};

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub module: ModuleId,
    /// The specifier named a whole package or script rather than a file
    /// inside the referrer's package.
    pub is_package_import: bool,
    /// The record was created by this call.
    pub created: bool,
}

/// Import resolver.
///
/// Resolution order, first match wins:
///
/// 1. absolute URLs become standalone modules keyed by the URL;
/// 2. relative specifiers resolve inside the referrer's package;
/// 3. `@empty` is the shared empty module;
/// 4. bare specifiers naming a configured package resolve to its entry point
///    or to the given path inside it;
/// 5. other bare specifiers go through the referrer package's alias map, and
///    finally through host normalization, producing standalone modules.
#[derive(Debug, Clone)]
pub struct Resolver {
    config: Arc<FreezerConfig>,
    normalizer: Arc<dyn HostNormalizer>,
}

impl Resolver {
    pub fn new(config: impl Into<Arc<FreezerConfig>>) -> Self {
        let config = config.into();
        let normalizer = Arc::new(BaseUrlNormalizer::new(config.settings.base_url.clone()));
        Self { config, normalizer }
    }

    pub fn with_normalizer(mut self, normalizer: impl HostNormalizer + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    pub fn config(&self) -> &FreezerConfig {
        &self.config
    }

    /// Resolve an entry specifier, one with no referencing module.
    pub fn resolve_entry(
        &self,
        graph: &ModuleGraph,
        specifier: &str,
    ) -> Result<Resolved, ResolutionError> {
        if let Specifier::Relative(relative) = Specifier::parse(specifier) {
            return Err(ResolutionError::RelativeEntry(relative.to_string()));
        }
        self.resolve_with_context(graph, None, None, specifier)
    }

    /// Resolve `specifier` as imported by `referrer`, creating the target
    /// record if needed. No edge is recorded.
    pub fn resolve(
        &self,
        graph: &ModuleGraph,
        referrer: &ModuleId,
        specifier: &str,
    ) -> Result<Resolved, ResolutionError> {
        let (package, name) = graph
            .module_context(referrer)
            .ok_or_else(|| ResolutionError::UnknownReferrer(referrer.clone()))?;

        if let Specifier::Relative(relative) = Specifier::parse(specifier) {
            let package = package.ok_or_else(|| ResolutionError::NoPackageContext {
                referrer: referrer.clone(),
                specifier: specifier.to_string(),
            })?;

            let mut path = join_path(parent_dir(&name), relative);
            if !path.starts_with('/') {
                path.insert(0, '/');
            }

            let package = self.ensure_package(graph, &package);
            return Ok(self.package_module(graph, &package, &path, false));
        }

        self.resolve_with_context(graph, Some(referrer), package.as_deref(), specifier)
    }

    /// Resolve one of the extra scripts configured for a standalone module.
    ///
    /// `dependency` is relative to the standalone module's own location.
    pub fn resolve_standalone_dependency(
        &self,
        graph: &ModuleGraph,
        owner: &ModuleId,
        dependency: &str,
    ) -> Resolved {
        let joined = join_path(parent_dir(owner.location()), dependency);
        self.standalone(graph, &self.normalizer.normalize(&joined), dependency)
    }

    /// Metadata dependencies configured for a standalone module.
    pub fn standalone_dependencies(&self, id: &ModuleId) -> &[String] {
        self.config
            .standalone
            .get(id.as_str())
            .map(|spec| spec.deps.as_slice())
            .unwrap_or_default()
    }

    fn resolve_with_context(
        &self,
        graph: &ModuleGraph,
        referrer: Option<&ModuleId>,
        referrer_package: Option<&str>,
        specifier: &str,
    ) -> Result<Resolved, ResolutionError> {
        let resolved = match Specifier::parse(specifier) {
            Specifier::Url(url) => Resolved {
                is_package_import: false,
                ..self.standalone(graph, url, specifier)
            },
            Specifier::Empty => self.empty(graph),
            Specifier::Relative(relative) => {
                // relative specifiers are handled by `resolve`
                return Err(ResolutionError::RelativeEntry(relative.to_string()));
            }
            Specifier::Bare { package, path } => {
                let whole_package = path.is_none();
                if self.config.package(package).is_some() {
                    let package = self.ensure_package(graph, package);
                    let path = match path {
                        Some(path) => format!("/{path}"),
                        None => self.entry_path(&package.name),
                    };
                    self.package_module(graph, &package, &path, whole_package)
                } else {
                    Resolved {
                        is_package_import: whole_package,
                        ..self.resolve_unknown(graph, referrer_package, specifier)
                    }
                }
            }
        };

        tracing::trace!(
            referrer = referrer.map(ModuleId::as_str).unwrap_or("<entry>"),
            specifier,
            module = %resolved.module,
            created = resolved.created,
            "resolved specifier"
        );
        Ok(resolved)
    }

    fn resolve_unknown(
        &self,
        graph: &ModuleGraph,
        referrer_package: Option<&str>,
        specifier: &str,
    ) -> Resolved {
        let alias = referrer_package
            .and_then(|name| self.config.package(name))
            .and_then(|spec| spec.alias(specifier));

        match alias.map(|target| target.classify()) {
            Some(AliasResolution::Exclude) => self.empty(graph),
            Some(AliasResolution::Relative(target)) => {
                let root = referrer_package
                    .and_then(|name| graph.package(name))
                    .map(|package| package.root_url)
                    .unwrap_or_default();
                let joined = join_path(&root, target);
                self.standalone(graph, &self.normalizer.normalize(&joined), specifier)
            }
            Some(AliasResolution::Specifier(target)) => {
                self.standalone(graph, &self.normalizer.normalize(target), specifier)
            }
            None => self.standalone(graph, &self.normalizer.normalize(specifier), specifier),
        }
    }

    fn entry_path(&self, package: &str) -> String {
        self.config
            .package(package)
            .map(|spec| spec.entry_path())
            .unwrap_or_else(|| freezer_config::DEFAULT_MAIN.to_string())
    }

    /// The graph's record of `name`, registered from configuration on first use.
    fn ensure_package(&self, graph: &ModuleGraph, name: &str) -> Package {
        if let Some(package) = graph.package(name) {
            return package;
        }

        let package = match self.config.package(name) {
            Some(spec) => {
                let package = Package::new(name, spec.version_or_default(), &spec.entry_path())
                    .excluded(spec.excluded);
                match &spec.root_url {
                    Some(root) => package.with_root_url(root.clone()),
                    None => package,
                }
            }
            None => Package::new(name, "0.0.0", freezer_config::DEFAULT_MAIN),
        };

        graph.add_package(package.clone());
        // another writer may have registered it first
        graph.package(name).unwrap_or(package)
    }

    fn package_module(
        &self,
        graph: &ModuleGraph,
        package: &Package,
        path: &str,
        is_package_import: bool,
    ) -> Resolved {
        let id = package.module_id(path);
        let created = graph.get_or_insert_with(&id, || {
            ModuleRecord::builder(id.clone(), ModuleKind::from_path(path))
                .name(path)
                .package(package.name.clone())
                .build()
        });
        Resolved {
            module: id,
            is_package_import,
            created,
        }
    }

    fn standalone(&self, graph: &ModuleGraph, canonical: &str, name: &str) -> Resolved {
        let id = ModuleId::standalone(canonical);
        if id.is_empty_module() {
            return self.empty(graph);
        }
        let created = graph.get_or_insert_with(&id, || {
            ModuleRecord::builder(id.clone(), ModuleKind::Standalone)
                .name(name)
                .build()
        });
        Resolved {
            module: id,
            is_package_import: true,
            created,
        }
    }

    fn empty(&self, graph: &ModuleGraph) -> Resolved {
        let id = ModuleId::empty();
        let created = graph.get_or_insert_with(&id, ModuleRecord::empty);
        Resolved {
            module: id,
            is_package_import: true,
            created,
        }
    }
}

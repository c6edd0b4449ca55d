//! # freezer-graph
//!
//! Module records, import resolution, the dependency graph and load-order
//! scheduling for frozen (pre-bundled) module sets.
//!
//! ## Overview
//!
//! - **Module records**: one [`ModuleRecord`] per qualified id, tagged with a
//!   closed [`ModuleKind`] (`Source`, `Json`, `Standalone`, `Empty`).
//! - **Resolution**: [`Resolver`] maps `(referrer, specifier)` pairs onto
//!   records, honouring package entry points and alias maps from
//!   [`freezer_config`].
//! - **Graph**: [`ModuleGraph`] is a cheap, clonable handle; the dependents
//!   index and deduplicated edge lists are derived views rebuilt after mutation.
//! - **Scheduling**: [`ModuleGraph::compute_load_plan`] orders modules package
//!   by package with a greedy pass that tolerates cycles.
//!
//! ## Quick Start
//!
//! ```rust
//! use freezer_config::{FreezerConfig, PackageSpec};
//! use freezer_graph::{GraphBuilder, MemorySource, ModuleId, PlanOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FreezerConfig::default().with_package("app", PackageSpec::new("1.0.0"));
//!
//! let source = MemorySource::new()
//!     .with(ModuleId::in_package("app", "1.0.0", "/index.js"), "import { x } from './util.js';")
//!     .with(ModuleId::in_package("app", "1.0.0", "/util.js"), "export const x = 1;");
//!
//! let builder = GraphBuilder::new(config, source);
//! let report = builder.build(["app"]);
//! assert!(report.failures.is_empty());
//!
//! let plan = builder.graph().compute_load_plan(&PlanOptions::default());
//! let order: Vec<_> = plan.ordered_modules.iter().map(ModuleId::as_str).collect();
//! assert_eq!(order, ["local://app@1.0.0/util.js", "local://app@1.0.0/index.js"]);
//! # Ok(())
//! # }
//! ```

mod binding;
mod builder;
mod collection;
mod error;
mod export;
mod host;
mod memory;
mod module;
mod module_id;
mod order;
mod package;
mod resolver;
mod source;
mod specifier;

pub use binding::{Binding, DependencyEdge};
pub use builder::{BuildReport, GraphBuilder, ModuleFailure};
pub use collection::{
    CollectedExport, CollectedImport, ImportedBinding, JsonParser, ModuleParser, OxcParser,
    ParsedModule, json_exports,
};
pub use error::{Error, ParseError, ResolutionError, Result, SourceError};
pub use export::{ExportEntry, ExportKind};
pub use host::{BaseUrlNormalizer, HostNormalizer};
pub use memory::{EdgeIndex, ModuleGraph};
pub use module::{ModuleBuilder, ModuleKind, ModuleRecord, ResolutionState};
pub use module_id::{EMPTY_MODULE_ID, LOCAL_SCHEME, ModuleId, ModuleIdError};
pub use order::{LoadPlan, PlanOptions};
pub use package::Package;
pub use resolver::{Resolved, Resolver};
pub use source::{FsSource, MemorySource, SourceProvider};
pub use specifier::{Specifier, is_url, join_path, parent_dir};

#[cfg(test)]
mod tests;

//! # freezer-runtime
//!
//! Executes a frozen module set in dependency order.
//!
//! Modules are registered with a [`ModuleBody`]: one setter per dependency,
//! invoked whenever that dependency's namespace may have changed, plus an
//! `execute` callback that fills the module's own [`Namespace`]. The
//! [`Registry`] computes a load plan from its [`ModuleGraph`] and runs it in
//! bounded passes, so cyclic modules that fail on a partially initialised
//! dependency get retried once the dependency has run.
//!
//! ```rust
//! use freezer_graph::{DependencyEdge, ModuleGraph, ModuleId, ModuleKind, ModuleRecord};
//! use freezer_runtime::{ModuleBody, Registry};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = ModuleGraph::new();
//! let config = ModuleId::standalone("config.js");
//! let app = ModuleId::standalone("app.js");
//! graph.add_module(ModuleRecord::builder(config.clone(), ModuleKind::Standalone).build());
//! graph.add_module(ModuleRecord::builder(app.clone(), ModuleKind::Standalone).build());
//! graph.add_dependency(&app, &config, DependencyEdge::default())?;
//!
//! let mut registry = Registry::new(graph);
//! registry.register(&config, ModuleBody::standalone(json!({ "port": 8080 })))?;
//! registry.register(
//!     &app,
//!     ModuleBody::with_imports(1, |imports, exports| {
//!         let port = imports[0].get("port").unwrap_or_default();
//!         exports.set("url", json!(format!("http://localhost:{port}")));
//!         Ok(())
//!     }),
//! )?;
//!
//! let report = registry.load(&app)?;
//! assert!(report.is_complete());
//! assert_eq!(
//!     registry.namespace(&app).and_then(|ns| ns.get("url")),
//!     Some(json!("http://localhost:8080"))
//! );
//! # Ok(())
//! # }
//! ```

mod body;
mod error;
mod loader;
mod namespace;
mod registry;
mod report;

#[cfg(feature = "logging")]
pub mod logging;

pub use body::{Execute, ModuleBody, Setter};
pub use error::{ExecutionError, Result, RuntimeError};
pub use namespace::Namespace;
pub use registry::{ExecState, LoadedModule, Registry};
pub use report::{Diagnostic, LoadReport, PendingReason};

pub use freezer_graph::{ModuleGraph, ModuleId};

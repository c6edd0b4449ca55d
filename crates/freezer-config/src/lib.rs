//! # freezer-config
//!
//! Configuration for the freezer resolver and loader: which packages exist,
//! where their entry points are, how bare specifiers are remapped, and the
//! settings the runtime loader runs with.
//!
//! Library users build a [`FreezerConfig`] programmatically (or from a
//! `serde_json::Value`); tools use [`ConfigDiscovery`] / [`FreezerConfig::load`]
//! to read `freezer.toml`, `freezer.json` or the `freezer` field of a
//! `package.json`.

pub mod config;
pub mod discovery;
pub mod error;
pub mod package;
pub mod settings;

pub use config::*;
pub use error::*;
pub use package::*;
pub use settings::*;

pub use discovery::{ConfigDiscovery, discover};

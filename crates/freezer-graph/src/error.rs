//! Error types for resolution, source loading and parsing.

use std::io;

use thiserror::Error;

use crate::module_id::{ModuleId, ModuleIdError};

/// Failure to map a specifier onto a module.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// A relative specifier was imported from a module that has no package.
    #[error("cannot resolve relative specifier '{specifier}' from '{referrer}': referrer has no package")]
    NoPackageContext {
        referrer: ModuleId,
        specifier: String,
    },

    #[error("referencing module '{0}' is not in the graph")]
    UnknownReferrer(ModuleId),

    /// An entry specifier was relative, so there is nothing to resolve it against.
    #[error("entry specifier '{0}' is relative; entries must be package names, urls or script ids")]
    RelativeEntry(String),
}

/// Failure to fetch the source text of a module.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no source available for '{0}'")]
    NotFound(ModuleId),

    #[error("failed to read source of '{id}': {source}")]
    Io {
        id: ModuleId,
        #[source]
        source: io::Error,
    },
}

/// Failure to parse a module's source.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("syntax error in '{id}': {message}")]
    Syntax { id: ModuleId, message: String },

    #[error("invalid JSON in '{id}': {source}")]
    Json {
        id: ModuleId,
        #[source]
        source: serde_json::Error,
    },
}

/// Error types for freezer graph operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid module id: {0}")]
    InvalidModuleId(#[from] ModuleIdError),

    /// A graph mutation referenced a module that was never added.
    #[error("module '{0}' is not in the graph")]
    UnknownModule(ModuleId),
}

/// Result type alias for freezer graph operations.
pub type Result<T> = std::result::Result<T, Error>;

use freezer_graph::ModuleId;
use thiserror::Error;

/// Failure reported by a module body. The loader keeps the module pending
/// and retries it on the next pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("{0}")]
    Thrown(String),

    /// A dependency hasn't exported a binding the body needs yet.
    #[error("import '{name}' is not available yet")]
    MissingImport { name: String },
}

impl ExecutionError {
    pub fn thrown(message: impl Into<String>) -> Self {
        ExecutionError::Thrown(message.into())
    }

    pub fn missing(name: impl Into<String>) -> Self {
        ExecutionError::MissingImport { name: name.into() }
    }
}

/// Misuse of the [`Registry`](crate::Registry).
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("module '{0}' is not in the graph")]
    UnknownModule(ModuleId),

    #[error("module '{id}' has {expected} dependencies but its body has {actual} setters")]
    SetterCountMismatch {
        id: ModuleId,
        expected: usize,
        actual: usize,
    },
}

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

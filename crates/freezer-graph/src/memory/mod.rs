//! In-memory ModuleGraph implementation.
//!
//! Records live in an insertion-ordered map guarded by a single lock. The
//! dependents index and deduplicated edge lists are derived views, rebuilt
//! wholesale on the first read after a mutation.

mod edges;
mod graph;
mod mutations;
mod packages;
mod queries;
mod traversal;

pub use edges::EdgeIndex;
pub use graph::ModuleGraph;

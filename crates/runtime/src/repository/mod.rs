//! Persistence for scheduler snapshots.
//!
//! Snapshots hold the clock, actors and every in-flight action by family,
//! variant name and mutable state. Definitions are never written; restoring
//! resolves names against whatever the registry holds at load time.
mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSnapshotRepository;
pub use memory::InMemorySnapshotRepository;
pub use traits::SnapshotRepository;

//! Reference driver for the action core.
//!
//! This crate steps in-flight actions for many actors per tick, applies their
//! outcomes to [`game_core::GameState`], and persists the in-flight set so a
//! session can resume mid-action.
//!
//! Modules are organized by responsibility:
//! - [`scheduler`] hosts the per-tick driver
//! - [`effects`] and [`input`] provide ready-made adapters for the core's
//!   presentation and decision channels
//! - [`repository`] saves and loads scheduler snapshots
//! - [`logging`] installs the tracing subscriber
pub mod effects;
pub mod error;
pub mod input;
pub mod logging;
pub mod repository;
pub mod scheduler;

pub use effects::{EffectLog, EffectRequest, SilentEffects, TracingEffects};
pub use error::{Result, RuntimeError};
pub use input::ScriptedInput;
pub use repository::{
    FileSnapshotRepository, InMemorySnapshotRepository, RepositoryError, SnapshotRepository,
};
pub use scheduler::{ActionScheduler, SchedulerSnapshot, TickReport};

//! Data-driven action content and loaders.
//!
//! This crate keeps the definition records for every action family on disk and
//! turns them into registry entries:
//! - Action definitions (one RON file per variant, grouped by family)
//! - Game configuration (TOML)
//!
//! Definitions are consumed through [`game_core::DefinitionSource`]; nothing in
//! here touches game state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ActionLoader, ConfigLoader, ContentFactory, LoadResult, RonDefinitionSource};

//! Traits describing the collaborators the action core consumes.
//!
//! The core never loads files, renders, plays audio, or decides what a player
//! or AI wants. It reaches those subsystems only through the interfaces here:
//! - [`DefinitionSource`]: named definition records per action family
//! - [`EffectSink`]: fire-and-forget presentation requests
//! - [`InputSource`]: the decision channel polled while an action awaits input
mod definitions;
mod effects;
mod error;
mod input;

pub use definitions::{DefinitionEntry, DefinitionSource, StaticDefinitionSource};
pub use effects::{EffectParams, EffectSink};
pub use error::{MalformedDefinition, SourceError};
pub use input::{ActionInput, InputRequest, InputSource, TargetRef};

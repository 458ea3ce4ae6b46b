//! Action-execution core for a turn-based tactical game.
//!
//! `game-core` defines how an entity's abilities are described, instantiated
//! and advanced through their lifecycle each tick. It is pure: definitions
//! arrive through [`env::DefinitionSource`], presentation leaves through
//! [`env::EffectSink`], and decisions are polled from [`env::InputSource`].
//! Drivers build actions with [`ActionRegistry`] and step them with
//! [`ActionLifecycle`].
pub mod action;
pub mod config;
pub mod env;
pub mod error;
pub mod state;

pub use action::{
    Action, ActionDefinition, ActionFamily, ActionInstance, ActionLifecycle, ActionOutcome,
    ActionPhase, ActionRegistry, ActionSnapshot, ActionState, BasicAttackDef, DamageKind,
    LifecycleError, LifecycleSnapshot, MaintenanceStatus, MoveDef, RegistrationReport,
    RegistryError, StepContext, StepEvent, Terminal, UseItemDef,
};
pub use config::GameConfig;
pub use env::{
    ActionInput, DefinitionEntry, DefinitionSource, EffectParams, EffectSink, InputRequest,
    InputSource, MalformedDefinition, SourceError, StaticDefinitionSource, TargetRef,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{ActorState, EntityId, GameState, Position, ResourceMeter, Tick};

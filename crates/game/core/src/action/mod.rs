//! Action domain - definitions, families, and the lifecycle they run through.
//!
//! # Module Structure
//!
//! - `definition`: Immutable per-variant parameter bundles (`ActionDefinition`)
//! - `kinds`: One module per family, each implementing [`Action`]
//! - `registry`: Family → variant constructors (`ActionRegistry`)
//! - `lifecycle`: The phase state machine that drives one instance (`ActionLifecycle`)
//! - `snapshot`: Name + mutable-state records for save/replay
//! - `error`: Registry and lifecycle errors
//!
//! Constant parameters always live in the shared definition. An instance only
//! owns the state it needs to track its own progress.

pub mod definition;
pub mod error;
pub mod kinds;
pub mod lifecycle;
pub mod registry;
pub mod snapshot;

pub use definition::{ActionDefinition, BasicAttackDef, DamageKind, MoveDef, UseItemDef};
pub use error::{LifecycleError, RegistryError};
pub use kinds::{
    ActionInstance, BasicAttack, BasicAttackState, Move, MoveState, Progress, UseItem,
    UseItemState,
};
pub use lifecycle::{ActionLifecycle, ActionPhase, StepContext, StepEvent, Terminal};
pub use registry::{ActionRegistry, RegistrationReport};
pub use snapshot::{ActionSnapshot, ActionState, LifecycleSnapshot};

use crate::env::{EffectSink, InputSource};
use crate::state::{ActorState, EntityId, Position, Tick};

/// A grouping of related action variants sharing one registry partition.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionFamily {
    /// Single-target strikes.
    Attacks,
    /// Relocation across tiles.
    Movement,
    /// Consuming an inventory item.
    Items,
}

impl ActionFamily {
    pub const ALL: [ActionFamily; 3] = [Self::Attacks, Self::Movement, Self::Items];
}

/// Result of one `maintain` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaintenanceStatus {
    InProgress,
    Complete,
}

impl MaintenanceStatus {
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Gameplay change produced by a completed action.
///
/// Actions never mutate game state themselves. The driver applies this once
/// the lifecycle reaches `Terminal::Complete`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    Damage {
        source: EntityId,
        target: EntityId,
        kind: DamageKind,
        amount: u32,
    },
    Moved {
        entity: EntityId,
        from: Position,
        to: Position,
    },
    ItemUsed {
        user: EntityId,
        target: EntityId,
        item: String,
        heal: u32,
    },
}

/// The lifecycle contract every action variant satisfies.
///
/// Operations are invoked by a driver in the order described on
/// [`ActionLifecycle`]; none of them are called again once a terminal phase is
/// reached.
pub trait Action {
    /// Family this variant belongs to.
    fn family(&self) -> ActionFamily;

    /// Variant name, used for definition lookup and serialization.
    fn name(&self) -> &str;

    /// True if the variant may be queued directly (false for reaction-only variants).
    fn readyable(&self) -> bool;

    /// Action-point price charged when input resolves. Constant per instance.
    fn cost(&self) -> u32;

    /// One-time setup against the acting entity. False aborts without charging.
    fn prep(&mut self, actor: &ActorState) -> bool;

    /// Polls for the pending decision. Returns true once resolved; further calls are no-ops.
    fn handle_input(&mut self, input: &mut dyn InputSource) -> bool;

    /// Requests presentation effects. Fires at most once per instance.
    fn handle_output(&mut self, effects: &mut dyn EffectSink);

    /// Advances internal timers by `dt`. Safe to call with a zero `dt`.
    fn maintain(&mut self, dt: Tick) -> MaintenanceStatus;

    /// Asks the action to stop early. False means it is past its interruptible window.
    fn interrupt(&mut self) -> bool;

    /// Unconditional teardown; releases anything reserved in `prep`.
    fn cancel(&mut self);

    /// Gameplay change to apply after completion. `None` before completion.
    fn outcome(&self) -> Option<ActionOutcome>;
}

//! Save/replay records for in-flight actions.
//!
//! A snapshot names its variant and carries only mutable state. The shared
//! definition is looked up again on restore, so saved data stays valid when a
//! definition's numbers are edited.

use crate::action::{
    ActionFamily, ActionPhase, BasicAttackState, MoveState, UseItemState,
};
use crate::state::EntityId;

/// Mutable state of one instance, tagged by family.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionState {
    Attack(BasicAttackState),
    Movement(MoveState),
    Item(UseItemState),
}

impl ActionState {
    pub fn family(&self) -> ActionFamily {
        match self {
            Self::Attack(_) => ActionFamily::Attacks,
            Self::Movement(_) => ActionFamily::Movement,
            Self::Item(_) => ActionFamily::Items,
        }
    }
}

/// `(family, variant, state)` record from which an instance can be rebuilt.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionSnapshot {
    pub family: ActionFamily,
    pub variant: String,
    pub state: ActionState,
}

/// An action snapshot plus the lifecycle bookkeeping around it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LifecycleSnapshot {
    pub actor: EntityId,
    pub phase: ActionPhase,
    pub charged: bool,
    pub polls: u32,
    pub action: ActionSnapshot,
}

//! Concrete action families.
//!
//! Each family pairs an immutable definition (shared through an `Arc`) with a
//! small mutable state struct. [`ActionInstance`] is the closed set of families
//! the registry can produce; adding a family means adding a variant here, so
//! the compiler checks that every family implements the full [`Action`]
//! contract.
pub mod attack;
pub mod item;
pub mod movement;

pub use attack::{BasicAttack, BasicAttackState};
pub use item::{UseItem, UseItemState};
pub use movement::{Move, MoveState};

use crate::action::{
    Action, ActionDefinition, ActionFamily, ActionOutcome, ActionSnapshot, ActionState,
    MaintenanceStatus, RegistryError,
};
use crate::env::{EffectSink, InputSource};
use crate::state::{ActorState, Tick};

/// Time accounting shared by every family's maintain phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    pub elapsed: Tick,
    pub output_fired: bool,
    pub completed: bool,
}

impl Progress {
    /// Accumulates `dt` and reports completion once some time has passed and
    /// the total reaches `duration`.
    ///
    /// Requiring non-zero elapsed time keeps the zero-`dt` tick that follows
    /// output from completing an instant action.
    pub fn advance(&mut self, dt: Tick, duration: Tick) -> MaintenanceStatus {
        self.elapsed = self.elapsed.saturating_add(dt);
        if !self.elapsed.is_zero() && self.elapsed >= duration {
            self.completed = true;
            MaintenanceStatus::Complete
        } else {
            MaintenanceStatus::InProgress
        }
    }
}

/// One queued or executing action bound to its variant's definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionInstance {
    Attack(BasicAttack),
    Movement(Move),
    Item(UseItem),
}

impl ActionInstance {
    /// Builds a fresh instance in its initial state.
    pub fn new(definition: ActionDefinition) -> Self {
        match definition {
            ActionDefinition::Attack(def) => Self::Attack(BasicAttack::new(def)),
            ActionDefinition::Movement(def) => Self::Movement(Move::new(def)),
            ActionDefinition::Item(def) => Self::Item(UseItem::new(def)),
        }
    }

    /// The shared definition this instance reads its constants from.
    pub fn definition(&self) -> ActionDefinition {
        match self {
            Self::Attack(action) => ActionDefinition::Attack(action.definition_arc()),
            Self::Movement(action) => ActionDefinition::Movement(action.definition_arc()),
            Self::Item(action) => ActionDefinition::Item(action.definition_arc()),
        }
    }

    /// Captures the name and mutable state; the definition is referenced by name only.
    pub fn snapshot(&self) -> ActionSnapshot {
        let state = match self {
            Self::Attack(action) => ActionState::Attack(action.state().clone()),
            Self::Movement(action) => ActionState::Movement(action.state().clone()),
            Self::Item(action) => ActionState::Item(action.state().clone()),
        };
        ActionSnapshot {
            family: self.family(),
            variant: self.name().to_string(),
            state,
        }
    }

    /// Overwrites the mutable state with a previously captured one.
    pub fn restore_state(&mut self, state: ActionState) -> Result<(), RegistryError> {
        match (self, state) {
            (Self::Attack(action), ActionState::Attack(state)) => action.set_state(state),
            (Self::Movement(action), ActionState::Movement(state)) => action.set_state(state),
            (Self::Item(action), ActionState::Item(state)) => action.set_state(state),
            (this, state) => {
                return Err(RegistryError::StateMismatch {
                    family: this.family(),
                    found: state.family(),
                });
            }
        }
        Ok(())
    }

    fn as_action(&self) -> &dyn Action {
        match self {
            Self::Attack(action) => action,
            Self::Movement(action) => action,
            Self::Item(action) => action,
        }
    }

    fn as_action_mut(&mut self) -> &mut dyn Action {
        match self {
            Self::Attack(action) => action,
            Self::Movement(action) => action,
            Self::Item(action) => action,
        }
    }
}

impl Action for ActionInstance {
    fn family(&self) -> ActionFamily {
        self.as_action().family()
    }

    fn name(&self) -> &str {
        self.as_action().name()
    }

    fn readyable(&self) -> bool {
        self.as_action().readyable()
    }

    fn cost(&self) -> u32 {
        self.as_action().cost()
    }

    fn prep(&mut self, actor: &ActorState) -> bool {
        self.as_action_mut().prep(actor)
    }

    fn handle_input(&mut self, input: &mut dyn InputSource) -> bool {
        self.as_action_mut().handle_input(input)
    }

    fn handle_output(&mut self, effects: &mut dyn EffectSink) {
        self.as_action_mut().handle_output(effects)
    }

    fn maintain(&mut self, dt: Tick) -> MaintenanceStatus {
        self.as_action_mut().maintain(dt)
    }

    fn interrupt(&mut self) -> bool {
        self.as_action_mut().interrupt()
    }

    fn cancel(&mut self) {
        self.as_action_mut().cancel()
    }

    fn outcome(&self) -> Option<ActionOutcome> {
        self.as_action().outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dt_never_completes() {
        let mut progress = Progress::default();
        assert_eq!(
            progress.advance(Tick::ZERO, Tick::ZERO),
            MaintenanceStatus::InProgress
        );
        assert_eq!(
            progress.advance(Tick(500), Tick::ZERO),
            MaintenanceStatus::Complete
        );
        assert!(progress.completed);
    }

    #[test]
    fn split_and_whole_dt_complete_at_same_total() {
        let mut split = Progress::default();
        assert_eq!(
            split.advance(Tick(300), Tick(500)),
            MaintenanceStatus::InProgress
        );
        assert_eq!(
            split.advance(Tick(200), Tick(500)),
            MaintenanceStatus::Complete
        );

        let mut whole = Progress::default();
        assert_eq!(
            whole.advance(Tick(500), Tick(500)),
            MaintenanceStatus::Complete
        );
        assert_eq!(split.elapsed, whole.elapsed);
    }
}

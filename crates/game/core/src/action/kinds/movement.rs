//! Movement: walk to a chosen tile, taking time proportional to distance.

use std::sync::Arc;

use super::Progress;
use crate::action::{Action, ActionFamily, ActionOutcome, MaintenanceStatus, MoveDef};
use crate::env::{ActionInput, EffectSink, InputRequest, InputSource};
use crate::state::{ActorState, EntityId, Position, Tick};

/// Mutable progress of one move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveState {
    pub actor: Option<EntityId>,
    pub origin: Position,
    pub destination: Option<Position>,
    pub progress: Progress,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    definition: Arc<MoveDef>,
    state: MoveState,
}

impl Move {
    pub fn new(definition: Arc<MoveDef>) -> Self {
        Self {
            definition,
            state: MoveState::default(),
        }
    }

    pub fn definition(&self) -> &MoveDef {
        &self.definition
    }

    pub(crate) fn definition_arc(&self) -> Arc<MoveDef> {
        Arc::clone(&self.definition)
    }

    pub fn state(&self) -> &MoveState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, state: MoveState) {
        self.state = state;
    }

    /// Walking time for the chosen path. Zero until a destination is picked.
    pub fn duration(&self) -> Tick {
        let tiles = self
            .state
            .destination
            .map_or(0, |destination| self.state.origin.distance(destination));
        Tick(u64::from(tiles).saturating_mul(self.definition.millis_per_tile))
    }
}

impl Action for Move {
    fn family(&self) -> ActionFamily {
        ActionFamily::Movement
    }

    fn name(&self) -> &str {
        &self.definition.name
    }

    fn readyable(&self) -> bool {
        true
    }

    fn cost(&self) -> u32 {
        self.definition.ap
    }

    fn prep(&mut self, actor: &ActorState) -> bool {
        if !actor.is_alive() || actor.action_points.current < self.cost() {
            return false;
        }
        self.state.actor = Some(actor.id);
        self.state.origin = actor.position;
        true
    }

    fn handle_input(&mut self, input: &mut dyn InputSource) -> bool {
        if self.state.destination.is_some() {
            return true;
        }
        let Some(actor) = self.state.actor else {
            return false;
        };

        let request = InputRequest::Position {
            origin: self.state.origin,
            range: self.definition.range,
        };
        match input.poll(actor, &request) {
            Some(ActionInput::Position(destination))
                if destination != self.state.origin
                    && request.accepts(&ActionInput::Position(destination)) =>
            {
                self.state.destination = Some(destination);
                true
            }
            _ => false,
        }
    }

    fn handle_output(&mut self, effects: &mut dyn EffectSink) {
        if self.state.progress.output_fired {
            return;
        }
        self.state.progress.output_fired = true;
        if let Some(sound) = &self.definition.sound {
            effects.request_sound(sound);
        }
    }

    fn maintain(&mut self, dt: Tick) -> MaintenanceStatus {
        let duration = self.duration();
        self.state.progress.advance(dt, duration)
    }

    fn interrupt(&mut self) -> bool {
        true
    }

    fn cancel(&mut self) {
        self.state.destination = None;
    }

    fn outcome(&self) -> Option<ActionOutcome> {
        if !self.state.progress.completed {
            return None;
        }
        Some(ActionOutcome::Moved {
            entity: self.state.actor?,
            from: self.state.origin,
            to: self.state.destination?,
        })
    }
}

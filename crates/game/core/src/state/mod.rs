//! Authoritative game state touched by the action core.
//!
//! Actions only read actors during preparation. Gameplay mutation happens when
//! a driver applies a completed action's [`crate::action::ActionOutcome`].
mod actor;
mod common;

use std::collections::BTreeMap;

pub use actor::{ActorState, ResourceMeter};
pub use common::{EntityId, Position, Tick};

/// Actors keyed by id plus the scheduler clock.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub clock: Tick,
    actors: BTreeMap<EntityId, ActorState>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an actor, returning the previous one.
    pub fn insert_actor(&mut self, actor: ActorState) -> Option<ActorState> {
        self.actors.insert(actor.id, actor)
    }

    pub fn remove_actor(&mut self, id: EntityId) -> Option<ActorState> {
        self.actors.remove(&id)
    }

    pub fn actor(&self, id: EntityId) -> Option<&ActorState> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut ActorState> {
        self.actors.get_mut(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.values()
    }

    pub fn actors_mut(&mut self) -> impl Iterator<Item = &mut ActorState> {
        self.actors.values_mut()
    }

    /// Returns the living actor standing on `position`, if any.
    pub fn actor_at(&self, position: Position) -> Option<&ActorState> {
        self.actors
            .values()
            .find(|actor| actor.position == position && actor.is_alive())
    }
}

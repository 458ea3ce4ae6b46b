//! Scripted decision source.
use std::collections::{BTreeMap, HashMap, VecDeque};

use game_core::{ActionInput, EntityId, GameState, InputRequest, InputSource, Position};

/// Delivers pre-queued decisions per actor, one per poll.
///
/// An empty queue answers `None`, so the polling action keeps waiting.
/// Decisions are handed over as-is; the action decides whether it accepts them.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    queued: HashMap<EntityId, VecDeque<ActionInput>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a decision for `actor`.
    pub fn push(&mut self, actor: EntityId, input: ActionInput) -> &mut Self {
        self.queued.entry(actor).or_default().push_back(input);
        self
    }

    #[must_use]
    pub fn with(mut self, actor: EntityId, input: ActionInput) -> Self {
        self.push(actor, input);
        self
    }

    /// Decisions still waiting for `actor`.
    pub fn pending(&self, actor: EntityId) -> usize {
        self.queued.get(&actor).map_or(0, VecDeque::len)
    }

    pub fn clear(&mut self, actor: EntityId) {
        self.queued.remove(&actor);
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, actor: EntityId, request: &InputRequest) -> Option<ActionInput> {
        let input = self.queued.get_mut(&actor)?.pop_front()?;
        if !request.accepts(&input) {
            tracing::debug!("actor {} input {:?} does not fit {:?}", actor, input, request);
        }
        Some(input)
    }
}

/// Pins entity targets to where the game state says they stand.
///
/// A `TargetRef` naming an unknown entity is dropped, so the action keeps
/// waiting. One whose tile disagrees with the state is rewritten to the real
/// tile before the action checks its range.
pub(crate) struct ResolvedInput<'a> {
    inner: &'a mut dyn InputSource,
    positions: BTreeMap<EntityId, Position>,
}

impl<'a> ResolvedInput<'a> {
    pub(crate) fn new(inner: &'a mut dyn InputSource, state: &GameState) -> Self {
        let positions = state
            .actors()
            .map(|actor| (actor.id, actor.position))
            .collect();
        Self { inner, positions }
    }
}

impl InputSource for ResolvedInput<'_> {
    fn poll(&mut self, actor: EntityId, request: &InputRequest) -> Option<ActionInput> {
        match self.inner.poll(actor, request)? {
            ActionInput::Entity(mut target) => {
                let Some(&actual) = self.positions.get(&target.entity) else {
                    tracing::warn!("actor {} targeted unknown entity {}", actor, target.entity);
                    return None;
                };
                if actual != target.position {
                    tracing::warn!(
                        "actor {} targeted {} at {}, but it stands at {}",
                        actor,
                        target.entity,
                        target.position,
                        actual
                    );
                    target.position = actual;
                }
                Some(ActionInput::Entity(target))
            }
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{ActorState, TargetRef};

    #[test]
    fn decisions_are_per_actor_and_fifo() {
        let other = EntityId(7);
        let mut input = ScriptedInput::new()
            .with(EntityId::PLAYER, ActionInput::Position(Position::new(1, 1)))
            .with(EntityId::PLAYER, ActionInput::None);
        let request = InputRequest::None;

        assert_eq!(input.poll(other, &request), None);
        assert_eq!(
            input.poll(EntityId::PLAYER, &request),
            Some(ActionInput::Position(Position::new(1, 1)))
        );
        assert_eq!(input.pending(EntityId::PLAYER), 1);
        assert_eq!(input.poll(EntityId::PLAYER, &request), Some(ActionInput::None));
        assert_eq!(input.poll(EntityId::PLAYER, &request), None);
    }

    #[test]
    fn resolved_targets_use_the_tile_from_state() {
        let goblin = EntityId(1);
        let mut state = GameState::new();
        state.insert_actor(ActorState::new(goblin, Position::new(9, 9), 10, 10));

        let claimed = |entity| {
            ActionInput::Entity(TargetRef {
                entity,
                position: Position::new(1, 0),
            })
        };
        let mut scripted = ScriptedInput::new()
            .with(EntityId::PLAYER, claimed(goblin))
            .with(EntityId::PLAYER, claimed(EntityId(42)))
            .with(EntityId::PLAYER, ActionInput::Position(Position::new(1, 0)));
        let mut input = ResolvedInput::new(&mut scripted, &state);
        let request = InputRequest::Entity {
            origin: Position::ORIGIN,
            range: 1,
        };

        let resolved = input.poll(EntityId::PLAYER, &request);
        assert_eq!(
            resolved,
            Some(ActionInput::Entity(TargetRef {
                entity: goblin,
                position: Position::new(9, 9),
            }))
        );
        assert!(!request.accepts(&resolved.unwrap()));
        assert_eq!(input.poll(EntityId::PLAYER, &request), None);
        assert_eq!(
            input.poll(EntityId::PLAYER, &request),
            Some(ActionInput::Position(Position::new(1, 0)))
        );
    }
}

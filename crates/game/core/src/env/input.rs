use crate::state::{EntityId, Position};

/// An entity selected as a target, with the tile it was seen on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetRef {
    pub entity: EntityId,
    pub position: Position,
}

/// What an action needs decided before it can fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputRequest {
    /// Nothing to decide; the action resolves input on its own.
    None,
    /// An entity within `range` tiles of `origin`.
    Entity { origin: Position, range: u32 },
    /// A tile within `range` tiles of `origin`.
    Position { origin: Position, range: u32 },
}

impl InputRequest {
    /// Returns true if `input` satisfies this request.
    pub fn accepts(&self, input: &ActionInput) -> bool {
        match (self, input) {
            (Self::None, ActionInput::None) => true,
            (Self::Entity { origin, range }, ActionInput::Entity(target)) => {
                origin.distance(target.position) <= *range
            }
            (Self::Position { origin, range }, ActionInput::Position(position)) => {
                origin.distance(*position) <= *range
            }
            _ => false,
        }
    }
}

/// A decision delivered by the player or AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionInput {
    None,
    Entity(TargetRef),
    Position(Position),
}

/// Decision channel polled once per tick while an action is preparing.
///
/// Returning `None` means no decision yet; the action keeps waiting.
pub trait InputSource {
    fn poll(&mut self, actor: EntityId, request: &InputRequest) -> Option<ActionInput>;
}

impl<F> InputSource for F
where
    F: FnMut(EntityId, &InputRequest) -> Option<ActionInput>,
{
    fn poll(&mut self, actor: EntityId, request: &InputRequest) -> Option<ActionInput> {
        self(actor, request)
    }
}

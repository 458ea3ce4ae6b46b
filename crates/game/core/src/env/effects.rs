use crate::state::{EntityId, Position};

/// Placement data attached to a visual effect request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectParams {
    pub source: EntityId,
    pub origin: Position,
    pub target: Option<Position>,
}

/// Fire-and-forget presentation requests (animations, sounds).
///
/// Actions call this from `handle_output` only. Nothing an implementation does
/// may feed back into action state.
pub trait EffectSink {
    fn request_visual_effect(&mut self, kind: &str, params: EffectParams);

    fn request_sound(&mut self, id: &str);
}

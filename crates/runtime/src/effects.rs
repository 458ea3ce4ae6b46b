//! Effect sinks handed to the scheduler.
//!
//! The core only requests presentation; these adapters decide what happens to
//! the requests.
use game_core::{EffectParams, EffectSink};

/// A recorded presentation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectRequest {
    Visual { kind: String, params: EffectParams },
    Sound { id: String },
}

/// Records every request in order. Useful for tests and replays.
#[derive(Clone, Debug, Default)]
pub struct EffectLog {
    requests: Vec<EffectRequest>,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[EffectRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Drains the recorded requests.
    pub fn take(&mut self) -> Vec<EffectRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl EffectSink for EffectLog {
    fn request_visual_effect(&mut self, kind: &str, params: EffectParams) {
        self.requests.push(EffectRequest::Visual {
            kind: kind.to_string(),
            params,
        });
    }

    fn request_sound(&mut self, id: &str) {
        self.requests.push(EffectRequest::Sound { id: id.to_string() });
    }
}

/// Logs requests at debug level and drops them.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEffects;

impl EffectSink for TracingEffects {
    fn request_visual_effect(&mut self, kind: &str, params: EffectParams) {
        tracing::debug!(
            source = %params.source,
            origin = %params.origin,
            target = ?params.target,
            "visual effect '{}'",
            kind
        );
    }

    fn request_sound(&mut self, id: &str) {
        tracing::debug!("sound '{}'", id);
    }
}

/// Discards every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentEffects;

impl EffectSink for SilentEffects {
    fn request_visual_effect(&mut self, _kind: &str, _params: EffectParams) {}

    fn request_sound(&mut self, _id: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{EntityId, Position};

    #[test]
    fn log_keeps_request_order() {
        let mut log = EffectLog::new();
        log.request_sound("swing");
        log.request_visual_effect(
            "arc",
            EffectParams {
                source: EntityId::PLAYER,
                origin: Position::ORIGIN,
                target: Some(Position::new(1, 0)),
            },
        );

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.requests()[0],
            EffectRequest::Sound {
                id: "swing".into()
            }
        );
        assert!(matches!(&log.requests()[1], EffectRequest::Visual { kind, .. } if kind == "arc"));

        assert_eq!(log.take().len(), 2);
        assert!(log.is_empty());
    }
}

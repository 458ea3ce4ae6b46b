//! Basic attacks: single target, usually instant, always readyable.

use std::sync::Arc;

use super::Progress;
use crate::action::{Action, ActionFamily, ActionOutcome, BasicAttackDef, MaintenanceStatus};
use crate::env::{ActionInput, EffectParams, EffectSink, InputRequest, InputSource, TargetRef};
use crate::state::{ActorState, EntityId, Position, Tick};

/// Mutable progress of one attack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicAttackState {
    pub actor: Option<EntityId>,
    pub origin: Position,
    pub target: Option<TargetRef>,
    pub progress: Progress,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicAttack {
    definition: Arc<BasicAttackDef>,
    state: BasicAttackState,
}

impl BasicAttack {
    pub fn new(definition: Arc<BasicAttackDef>) -> Self {
        Self {
            definition,
            state: BasicAttackState::default(),
        }
    }

    pub fn definition(&self) -> &BasicAttackDef {
        &self.definition
    }

    pub(crate) fn definition_arc(&self) -> Arc<BasicAttackDef> {
        Arc::clone(&self.definition)
    }

    pub fn state(&self) -> &BasicAttackState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, state: BasicAttackState) {
        self.state = state;
    }
}

impl Action for BasicAttack {
    fn family(&self) -> ActionFamily {
        ActionFamily::Attacks
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
        if self.state.target.is_some() {
            return true;
        }
        let Some(actor) = self.state.actor else {
            return false;
        };

        let request = InputRequest::Entity {
            origin: self.state.origin,
            range: self.definition.range,
        };
        match input.poll(actor, &request) {
            Some(ActionInput::Entity(target))
                if target.entity != actor && request.accepts(&ActionInput::Entity(target)) =>
            {
                self.state.target = Some(target);
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

        let Some(actor) = self.state.actor else {
            return;
        };
        if let Some(effect) = &self.definition.effect {
            effects.request_visual_effect(
                effect,
                EffectParams {
                    source: actor,
                    origin: self.state.origin,
                    target: self.state.target.map(|target| target.position),
                },
            );
        }
        if let Some(sound) = &self.definition.sound {
            effects.request_sound(sound);
        }
    }

    fn maintain(&mut self, dt: Tick) -> MaintenanceStatus {
        self.state.progress.advance(dt, self.definition.duration)
    }

    /// Once the strike has been shown it resolves atomically.
    fn interrupt(&mut self) -> bool {
        !self.state.progress.output_fired
    }

    fn cancel(&mut self) {
        self.state.target = None;
    }

    fn outcome(&self) -> Option<ActionOutcome> {
        if !self.state.progress.completed {
            return None;
        }
        let source = self.state.actor?;
        let target = self.state.target?;
        Some(ActionOutcome::Damage {
            source,
            target: target.entity,
            kind: self.definition.kind,
            amount: self.definition.strength,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::DamageKind;

    fn slash() -> Arc<BasicAttackDef> {
        Arc::new(BasicAttackDef {
            name: "slash".into(),
            kind: DamageKind::Physical,
            ap: 2,
            strength: 3,
            range: 1,
            duration: Tick::ZERO,
            effect: Some("slash_arc".into()),
            sound: Some("blade".into()),
        })
    }

    #[derive(Default)]
    struct Recorder {
        visuals: Vec<String>,
        sounds: Vec<String>,
    }

    impl EffectSink for Recorder {
        fn request_visual_effect(&mut self, kind: &str, _params: EffectParams) {
            self.visuals.push(kind.to_string());
        }

        fn request_sound(&mut self, id: &str) {
            self.sounds.push(id.to_string());
        }
    }

    fn target_at(x: i32, y: i32) -> impl FnMut(EntityId, &InputRequest) -> Option<ActionInput> {
        move |_, _| {
            Some(ActionInput::Entity(TargetRef {
                entity: EntityId(7),
                position: Position::new(x, y),
            }))
        }
    }

    #[test]
    fn prep_rejects_dead_or_broke_actor() {
        let mut attack = BasicAttack::new(slash());

        let mut dead = ActorState::new(EntityId(1), Position::ORIGIN, 10, 5);
        dead.hp.current = 0;
        assert!(!attack.prep(&dead));

        let broke = ActorState::new(EntityId(1), Position::ORIGIN, 10, 1);
        assert!(!attack.prep(&broke));

        let ready = ActorState::new(EntityId(1), Position::ORIGIN, 10, 2);
        assert!(attack.prep(&ready));
    }

    #[test]
    fn input_ignores_out_of_range_targets() {
        let mut attack = BasicAttack::new(slash());
        attack.prep(&ActorState::new(EntityId(1), Position::ORIGIN, 10, 5));

        assert!(!attack.handle_input(&mut target_at(3, 0)));
        assert!(attack.handle_input(&mut target_at(1, 0)));
        // Resolved input is sticky even if later polls would disagree.
        assert!(attack.handle_input(&mut target_at(9, 9)));
        assert_eq!(attack.state().target.map(|t| t.position), Some(Position::new(1, 0)));
    }

    #[test]
    fn input_rejects_self_target() {
        let mut attack = BasicAttack::new(slash());
        attack.prep(&ActorState::new(EntityId(7), Position::ORIGIN, 10, 5));
        assert!(!attack.handle_input(&mut target_at(1, 0)));
    }

    #[test]
    fn output_fires_once_and_closes_interrupt_window() {
        let mut attack = BasicAttack::new(slash());
        attack.prep(&ActorState::new(EntityId(1), Position::ORIGIN, 10, 5));
        attack.handle_input(&mut target_at(1, 1));
        assert!(attack.interrupt());

        let mut effects = Recorder::default();
        attack.handle_output(&mut effects);
        attack.handle_output(&mut effects);
        assert_eq!(effects.visuals, vec!["slash_arc"]);
        assert_eq!(effects.sounds, vec!["blade"]);
        assert!(!attack.interrupt());
    }

    #[test]
    fn outcome_only_after_completion() {
        let mut attack = BasicAttack::new(slash());
        attack.prep(&ActorState::new(EntityId(1), Position::ORIGIN, 10, 5));
        attack.handle_input(&mut target_at(1, 1));
        attack.handle_output(&mut Recorder::default());

        assert_eq!(attack.maintain(Tick::ZERO), MaintenanceStatus::InProgress);
        assert!(attack.outcome().is_none());
        assert_eq!(attack.maintain(Tick(500)), MaintenanceStatus::Complete);
        assert_eq!(
            attack.outcome(),
            Some(ActionOutcome::Damage {
                source: EntityId(1),
                target: EntityId(7),
                kind: DamageKind::Physical,
                amount: 3,
            })
        );
    }
}

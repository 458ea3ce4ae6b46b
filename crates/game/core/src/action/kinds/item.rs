//! Item use: consume a carried item to restore hit points.
//!
//! The item is reserved during prep and only consumed when the driver applies
//! the completed outcome, so cancelling or interrupting leaves the inventory
//! untouched.

use std::sync::Arc;

use super::Progress;
use crate::action::{Action, ActionFamily, ActionOutcome, MaintenanceStatus, UseItemDef};
use crate::env::{ActionInput, EffectParams, EffectSink, InputRequest, InputSource, TargetRef};
use crate::state::{ActorState, EntityId, Position, Tick};

/// Mutable progress of one item use.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseItemState {
    pub actor: Option<EntityId>,
    pub origin: Position,
    /// Item held back for this use; cleared on cancel.
    pub reserved: Option<String>,
    pub target: Option<TargetRef>,
    pub progress: Progress,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseItem {
    definition: Arc<UseItemDef>,
    state: UseItemState,
}

impl UseItem {
    pub fn new(definition: Arc<UseItemDef>) -> Self {
        Self {
            definition,
            state: UseItemState::default(),
        }
    }

    pub fn definition(&self) -> &UseItemDef {
        &self.definition
    }

    pub(crate) fn definition_arc(&self) -> Arc<UseItemDef> {
        Arc::clone(&self.definition)
    }

    pub fn state(&self) -> &UseItemState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, state: UseItemState) {
        self.state = state;
    }

    fn self_targeted(&self) -> bool {
        self.definition.range == 0
    }
}

impl Action for UseItem {
    fn family(&self) -> ActionFamily {
        ActionFamily::Items
    }

    fn name(&self) -> &str {
        &self.definition.name
    }

    fn readyable(&self) -> bool {
        self.definition.readyable
    }

    fn cost(&self) -> u32 {
        self.definition.ap
    }

    fn prep(&mut self, actor: &ActorState) -> bool {
        if !actor.is_alive()
            || actor.action_points.current < self.cost()
            || !actor.has_item(&self.definition.item)
        {
            return false;
        }
        self.state.actor = Some(actor.id);
        self.state.origin = actor.position;
        self.state.reserved = Some(self.definition.item.clone());
        true
    }

    fn handle_input(&mut self, input: &mut dyn InputSource) -> bool {
        if self.state.target.is_some() {
            return true;
        }
        let Some(actor) = self.state.actor else {
            return false;
        };

        if self.self_targeted() {
            self.state.target = Some(TargetRef {
                entity: actor,
                position: self.state.origin,
            });
            return true;
        }

        let request = InputRequest::Entity {
            origin: self.state.origin,
            range: self.definition.range,
        };
        match input.poll(actor, &request) {
            Some(choice @ ActionInput::Entity(target)) if request.accepts(&choice) => {
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

    fn interrupt(&mut self) -> bool {
        if !self.definition.interruptible {
            return false;
        }
        self.state.reserved = None;
        true
    }

    fn cancel(&mut self) {
        self.state.reserved = None;
        self.state.target = None;
    }

    fn outcome(&self) -> Option<ActionOutcome> {
        if !self.state.progress.completed {
            return None;
        }
        Some(ActionOutcome::ItemUsed {
            user: self.state.actor?,
            target: self.state.target?.entity,
            item: self.state.reserved.clone()?,
            heal: self.definition.magnitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn potion(range: u32) -> Arc<UseItemDef> {
        Arc::new(UseItemDef {
            name: "quaff".into(),
            ap: 1,
            item: "potion".into(),
            magnitude: 5,
            range,
            readyable: true,
            interruptible: false,
            duration: Tick(200),
            effect: None,
            sound: None,
        })
    }

    fn never(_: EntityId, _: &InputRequest) -> Option<ActionInput> {
        None
    }

    #[test]
    fn prep_requires_item() {
        let mut quaff = UseItem::new(potion(0));
        let empty = ActorState::new(EntityId(1), Position::ORIGIN, 10, 3);
        assert!(!quaff.prep(&empty));
        assert!(quaff.state().reserved.is_none());

        let carrying = empty.with_item("potion");
        assert!(quaff.prep(&carrying));
        assert_eq!(quaff.state().reserved.as_deref(), Some("potion"));
    }

    #[test]
    fn self_target_resolves_without_polling() {
        let mut quaff = UseItem::new(potion(0));
        quaff.prep(&ActorState::new(EntityId(1), Position::new(2, 2), 10, 3).with_item("potion"));
        assert!(quaff.handle_input(&mut never));
        assert_eq!(
            quaff.state().target,
            Some(TargetRef {
                entity: EntityId(1),
                position: Position::new(2, 2)
            })
        );
    }

    #[test]
    fn ranged_use_waits_for_target() {
        let mut throw = UseItem::new(potion(2));
        throw.prep(&ActorState::new(EntityId(1), Position::ORIGIN, 10, 3).with_item("potion"));
        assert!(!throw.handle_input(&mut never));

        let mut ally = |_: EntityId, _: &InputRequest| {
            Some(ActionInput::Entity(TargetRef {
                entity: EntityId(4),
                position: Position::new(2, 0),
            }))
        };
        assert!(throw.handle_input(&mut ally));
    }

    #[test]
    fn refuses_interrupt_and_cancel_releases_reservation() {
        let mut quaff = UseItem::new(potion(0));
        quaff.prep(&ActorState::new(EntityId(1), Position::ORIGIN, 10, 3).with_item("potion"));
        assert!(!quaff.interrupt());
        assert!(quaff.state().reserved.is_some());

        quaff.cancel();
        assert!(quaff.state().reserved.is_none());
        assert!(quaff.outcome().is_none());
    }

    #[test]
    fn completed_use_reports_heal() {
        let mut quaff = UseItem::new(potion(0));
        quaff.prep(&ActorState::new(EntityId(1), Position::ORIGIN, 10, 3).with_item("potion"));
        quaff.handle_input(&mut never);
        assert_eq!(quaff.maintain(Tick(100)), MaintenanceStatus::InProgress);
        assert_eq!(quaff.maintain(Tick(100)), MaintenanceStatus::Complete);
        assert_eq!(
            quaff.outcome(),
            Some(ActionOutcome::ItemUsed {
                user: EntityId(1),
                target: EntityId(1),
                item: "potion".into(),
                heal: 5,
            })
        );
    }
}

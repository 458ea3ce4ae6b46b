//! Tick-driven driver that steps at most one action per actor.
//!
//! Each tick hands the configured `dt` to every in-flight lifecycle in actor
//! order, applies completed outcomes to the game state immediately, and drops
//! lifecycles that reached a terminal phase. A failing actor is logged and its
//! action cancelled; the remaining actors still step in the same tick.

use std::collections::BTreeMap;

use game_core::{
    Action, ActionFamily, ActionLifecycle, ActionOutcome, ActionRegistry, DefinitionSource,
    EffectSink, EntityId, GameConfig, GameState, InputSource, LifecycleSnapshot,
    RegistrationReport, ResourceMeter, StepContext, StepEvent, Terminal, Tick,
};

use crate::error::{Result, RuntimeError};
use crate::input::ResolvedInput;

/// Everything needed to resume a session mid-action.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SchedulerSnapshot {
    pub state: GameState,
    pub actions: Vec<LifecycleSnapshot>,
}

impl SchedulerSnapshot {
    pub fn clock(&self) -> Tick {
        self.state.clock
    }
}

/// What happened during one tick.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Clock after the tick.
    pub clock: Tick,
    pub events: Vec<(EntityId, StepEvent)>,
    /// Lifecycles removed at the end of the tick.
    pub finished: Vec<(EntityId, Terminal)>,
    pub failures: Vec<(EntityId, RuntimeError)>,
}

impl TickReport {
    pub fn event(&self, actor: EntityId) -> Option<&StepEvent> {
        self.events
            .iter()
            .find(|(id, _)| *id == actor)
            .map(|(_, event)| event)
    }

    pub fn terminal(&self, actor: EntityId) -> Option<Terminal> {
        self.finished
            .iter()
            .find(|(id, _)| *id == actor)
            .map(|(_, terminal)| *terminal)
    }

    pub fn failure(&self, actor: EntityId) -> Option<&RuntimeError> {
        self.failures
            .iter()
            .find(|(id, _)| *id == actor)
            .map(|(_, error)| error)
    }

    /// Outcomes applied this tick, in application order.
    pub fn outcomes(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.events.iter().filter_map(|(_, event)| match event {
            StepEvent::Completed(Some(outcome)) => Some(outcome),
            _ => None,
        })
    }
}

pub struct ActionScheduler {
    registry: ActionRegistry,
    state: GameState,
    config: GameConfig,
    in_flight: BTreeMap<EntityId, ActionLifecycle>,
}

impl ActionScheduler {
    pub fn new(registry: ActionRegistry, state: GameState, config: GameConfig) -> Self {
        Self {
            registry,
            state,
            config,
            in_flight: BTreeMap::new(),
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> Tick {
        self.state.clock
    }

    /// The lifecycle `actor` is currently running, if any.
    pub fn in_flight(&self, actor: EntityId) -> Option<&ActionLifecycle> {
        self.in_flight.get(&actor)
    }

    pub fn busy_actors(&self) -> Vec<EntityId> {
        self.in_flight.keys().copied().collect()
    }

    /// Builds `name` from `family` and queues it for `actor`.
    ///
    /// Nothing is queued if the variant is unknown or not readyable.
    pub fn queue(&mut self, actor: EntityId, family: ActionFamily, name: &str) -> Result<()> {
        if self.state.actor(actor).is_none() {
            return Err(RuntimeError::ActorNotFound(actor));
        }
        if let Some(current) = self.in_flight.get(&actor) {
            return Err(RuntimeError::ActorBusy {
                actor,
                name: current.action().name().to_string(),
            });
        }

        let action = self.registry.create_action(family, name)?;
        let lifecycle = ActionLifecycle::queue(actor, action)?;
        tracing::debug!("actor {} queued {}/{}", actor, family, name);
        self.in_flight.insert(actor, lifecycle);
        Ok(())
    }

    /// Advances every in-flight action by the configured tick length.
    pub fn tick(
        &mut self,
        input: &mut dyn InputSource,
        effects: &mut dyn EffectSink,
    ) -> TickReport {
        let dt = self.config.tick();
        self.advance(dt, input, effects)
    }

    /// Advances every in-flight action by `dt`.
    pub fn advance(
        &mut self,
        dt: Tick,
        input: &mut dyn InputSource,
        effects: &mut dyn EffectSink,
    ) -> TickReport {
        self.state.clock += dt;
        let mut report = TickReport {
            clock: self.state.clock,
            ..TickReport::default()
        };

        for actor in self.busy_actors() {
            match self.step_actor(actor, dt, input, effects) {
                Ok(Some(event)) => {
                    if let StepEvent::Completed(Some(outcome)) = &event {
                        self.apply_outcome(outcome);
                    }
                    report.events.push((actor, event));
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!("actor {} action failed: {}", actor, error);
                    if let Some(lifecycle) = self.in_flight.get_mut(&actor) {
                        // No-op when the failure already finished the lifecycle.
                        let _ = lifecycle.cancel();
                    }
                    report.failures.push((actor, error));
                }
            }
        }

        self.reap(&mut report);
        report
    }

    /// Asks `actor`'s action to stop. Returns false if the action refused and
    /// is still running.
    pub fn interrupt(&mut self, actor: EntityId) -> Result<bool> {
        let lifecycle = self
            .in_flight
            .get_mut(&actor)
            .ok_or(RuntimeError::NoActionInFlight(actor))?;

        let accepted = lifecycle.interrupt()?;
        if accepted {
            tracing::info!(
                "actor {} '{}' interrupted",
                actor,
                lifecycle.action().name()
            );
            self.in_flight.remove(&actor);
        } else {
            tracing::debug!(
                "actor {} '{}' refused interrupt",
                actor,
                lifecycle.action().name()
            );
        }
        Ok(accepted)
    }

    /// Tears down `actor`'s action unconditionally.
    pub fn cancel(&mut self, actor: EntityId) -> Result<()> {
        let mut lifecycle = self
            .in_flight
            .remove(&actor)
            .ok_or(RuntimeError::NoActionInFlight(actor))?;

        lifecycle.cancel()?;
        tracing::info!("actor {} '{}' cancelled", actor, lifecycle.action().name());
        Ok(())
    }

    /// Cancels every in-flight action, returning the affected actors.
    pub fn cancel_all(&mut self) -> Vec<EntityId> {
        let in_flight = std::mem::take(&mut self.in_flight);
        if !in_flight.is_empty() {
            tracing::info!("cancelling {} in-flight action(s)", in_flight.len());
        }

        in_flight
            .into_iter()
            .map(|(actor, mut lifecycle)| {
                let _ = lifecycle.cancel();
                actor
            })
            .collect()
    }

    /// Restores `actor`'s action points for a new turn.
    pub fn begin_turn(&mut self, actor: EntityId) -> Result<()> {
        let points = self.config.default_action_points;
        let state = self
            .state
            .actor_mut(actor)
            .ok_or(RuntimeError::ActorNotFound(actor))?;

        state.action_points = ResourceMeter::full(points);
        tracing::debug!("actor {} begins turn with {} AP", actor, points);
        Ok(())
    }

    /// Starts a new turn for every actor.
    pub fn begin_round(&mut self) {
        let points = self.config.default_action_points;
        for actor in self.state.actors_mut() {
            actor.action_points = ResourceMeter::full(points);
        }
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            state: self.state.clone(),
            actions: self
                .in_flight
                .values()
                .map(ActionLifecycle::snapshot)
                .collect(),
        }
    }

    /// Replaces the game state and in-flight set with `snapshot`.
    ///
    /// Variants are resolved against the current registry. If any of them
    /// cannot be rebuilt, nothing is replaced.
    pub fn restore(&mut self, snapshot: &SchedulerSnapshot) -> Result<()> {
        let mut in_flight = BTreeMap::new();
        for saved in &snapshot.actions {
            if snapshot.state.actor(saved.actor).is_none() {
                return Err(RuntimeError::ActorNotFound(saved.actor));
            }
            let lifecycle = ActionLifecycle::restore(&self.registry, saved)?;
            in_flight.insert(saved.actor, lifecycle);
        }

        self.state = snapshot.state.clone();
        self.in_flight = in_flight;
        tracing::info!(
            "restored {} in-flight action(s) at {}",
            self.in_flight.len(),
            self.state.clock
        );
        Ok(())
    }

    /// Reloads one family's definitions.
    ///
    /// Actions already in flight keep the definition they were built with.
    pub fn reload_family(
        &mut self,
        family: ActionFamily,
        source: &dyn DefinitionSource,
    ) -> Result<RegistrationReport> {
        let report = self.registry.register_family(family, source)?;
        for skipped in &report.skipped {
            tracing::warn!(
                family = %skipped.family,
                origin = %skipped.origin,
                "Skipping action definition: {}",
                skipped.reason
            );
        }
        tracing::info!(
            "reloaded {} with {} variant(s)",
            family,
            report.loaded.len()
        );
        Ok(report)
    }

    fn step_actor(
        &mut self,
        id: EntityId,
        dt: Tick,
        input: &mut dyn InputSource,
        effects: &mut dyn EffectSink,
    ) -> Result<Option<StepEvent>> {
        let Some(lifecycle) = self.in_flight.get_mut(&id) else {
            return Ok(None);
        };
        // Cancelled earlier this tick, e.g. its actor was defeated.
        if lifecycle.is_terminal() {
            return Ok(None);
        }
        let mut input = ResolvedInput::new(input, &self.state);
        let actor = self
            .state
            .actor_mut(id)
            .ok_or(RuntimeError::ActorNotFound(id))?;

        let event = lifecycle.step(StepContext {
            actor,
            input: &mut input,
            effects,
            dt,
        })?;

        match &event {
            StepEvent::AwaitingInput if self.config.input_exhausted(lifecycle.polls()) => {
                return Err(RuntimeError::InputTimedOut {
                    actor: id,
                    polls: lifecycle.polls(),
                });
            }
            StepEvent::Started { cost } => {
                tracing::debug!(
                    "actor {} started '{}' for {} AP",
                    id,
                    lifecycle.action().name(),
                    cost
                );
            }
            _ => {}
        }
        Ok(Some(event))
    }

    fn apply_outcome(&mut self, outcome: &ActionOutcome) {
        match outcome {
            ActionOutcome::Damage {
                source,
                target,
                kind,
                amount,
            } => {
                let Some(victim) = self.state.actor_mut(*target) else {
                    tracing::warn!("damage target {} is gone", target);
                    return;
                };
                let dealt = victim.hp.drain(*amount);
                tracing::info!("{} dealt {} {} damage to {}", source, dealt, kind, target);

                if !victim.is_alive() {
                    tracing::info!("actor {} was defeated", target);
                    if let Some(lifecycle) = self.in_flight.get_mut(target) {
                        let _ = lifecycle.cancel();
                    }
                }
            }
            ActionOutcome::Moved { entity, from, to } => {
                if let Some(occupant) = self.state.actor_at(*to)
                    && occupant.id != *entity
                {
                    tracing::warn!(
                        "actor {} cannot enter {}: occupied by {}",
                        entity,
                        to,
                        occupant.id
                    );
                    return;
                }
                let Some(actor) = self.state.actor_mut(*entity) else {
                    tracing::warn!("moving actor {} is gone", entity);
                    return;
                };
                actor.position = *to;
                tracing::debug!("actor {} moved {} -> {}", entity, from, to);
            }
            ActionOutcome::ItemUsed {
                user,
                target,
                item,
                heal,
            } => {
                if self.state.actor(*target).is_none() {
                    tracing::warn!("'{}' target {} is gone; {} keeps it", item, target, user);
                    return;
                }
                let consumed = self
                    .state
                    .actor_mut(*user)
                    .is_some_and(|actor| actor.take_item(item));
                if !consumed {
                    tracing::warn!("actor {} no longer carries '{}'", user, item);
                    return;
                }
                if let Some(recipient) = self.state.actor_mut(*target) {
                    let healed = recipient.hp.restore(*heal);
                    tracing::info!("{} used '{}' on {}, healing {}", user, item, target, healed);
                }
            }
        }
    }

    fn reap(&mut self, report: &mut TickReport) {
        self.in_flight
            .retain(|&actor, lifecycle| match lifecycle.phase().terminal() {
                Some(terminal) => {
                    tracing::info!(
                        "actor {} '{}' finished: {:?}",
                        actor,
                        lifecycle.action().name(),
                        terminal
                    );
                    report.finished.push((actor, terminal));
                    false
                }
                None => true,
            });
    }
}

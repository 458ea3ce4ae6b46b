//! Phase state machine for one queued action.
//!
//! ```text
//! Unstarted --prep ok--> Preparing --input resolved (cost charged)--> OutputPending
//! OutputPending --output fired--> Maintaining --maintain Complete--> Finished(Complete)
//! any non-terminal --interrupt accepted--> Finished(Interrupted)
//! any non-terminal --cancel--> Finished(Cancelled)
//! ```
//!
//! [`ActionLifecycle::step`] runs one tick: on the tick input resolves, the cost
//! is charged, output fires and `maintain` is called with a zero `dt` before the
//! step returns. Every later tick calls `maintain` with the tick's `dt`.
//! Once finished, every operation returns [`LifecycleError::AlreadyTerminal`].

use crate::action::{
    Action, ActionInstance, ActionOutcome, ActionRegistry, LifecycleError, LifecycleSnapshot,
    MaintenanceStatus, RegistryError,
};
use crate::env::{EffectSink, InputSource};
use crate::state::{ActorState, EntityId, Tick};

/// How a lifecycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terminal {
    Complete,
    Interrupted,
    Cancelled,
}

/// Current phase of an [`ActionLifecycle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionPhase {
    Unstarted,
    /// Prepared and waiting for input.
    Preparing,
    /// Input resolved and cost charged; output not yet fired.
    OutputPending,
    Maintaining,
    Finished(Terminal),
}

impl ActionPhase {
    pub const fn terminal(self) -> Option<Terminal> {
        match self {
            Self::Finished(terminal) => Some(terminal),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

/// Collaborators handed to one [`ActionLifecycle::step`].
pub struct StepContext<'a> {
    /// The acting entity; charged when input resolves.
    pub actor: &'a mut ActorState,
    pub input: &'a mut dyn InputSource,
    pub effects: &'a mut dyn EffectSink,
    /// Time elapsed since the previous tick.
    pub dt: Tick,
}

/// What happened during one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// Still waiting for a decision.
    AwaitingInput,
    /// Input resolved this tick; `cost` was charged and output fired.
    Started { cost: u32 },
    /// Maintaining and not yet finished.
    InProgress,
    /// Finished with `Terminal::Complete`; carries the gameplay change to apply.
    Completed(Option<ActionOutcome>),
}

/// One action instance bound to its actor, plus the phase bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionLifecycle {
    actor: EntityId,
    action: ActionInstance,
    phase: ActionPhase,
    charged: bool,
    polls: u32,
}

impl ActionLifecycle {
    /// Queues `action` for `actor`.
    ///
    /// Fails with [`LifecycleError::NotReadyable`] for reaction-only variants.
    pub fn queue(actor: EntityId, action: ActionInstance) -> Result<Self, LifecycleError> {
        if !action.readyable() {
            return Err(LifecycleError::NotReadyable {
                name: action.name().to_string(),
            });
        }
        Ok(Self {
            actor,
            action,
            phase: ActionPhase::Unstarted,
            charged: false,
            polls: 0,
        })
    }

    /// Rebuilds a lifecycle from a snapshot, resolving the definition by name.
    pub fn restore(
        registry: &ActionRegistry,
        snapshot: &LifecycleSnapshot,
    ) -> Result<Self, RegistryError> {
        let action = registry.restore(&snapshot.action)?;
        Ok(Self {
            actor: snapshot.actor,
            action,
            phase: snapshot.phase,
            charged: snapshot.charged,
            polls: snapshot.polls,
        })
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        LifecycleSnapshot {
            actor: self.actor,
            phase: self.phase,
            charged: self.charged,
            polls: self.polls,
            action: self.action.snapshot(),
        }
    }

    pub fn actor(&self) -> EntityId {
        self.actor
    }

    pub fn action(&self) -> &ActionInstance {
        &self.action
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// True once the cost has been deducted from the actor.
    pub fn charged(&self) -> bool {
        self.charged
    }

    /// Number of input polls made so far.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// The completed action's gameplay change; `None` unless finished with `Complete`.
    pub fn outcome(&self) -> Option<ActionOutcome> {
        match self.phase {
            ActionPhase::Finished(Terminal::Complete) => self.action.outcome(),
            _ => None,
        }
    }

    /// Runs one tick of the lifecycle.
    pub fn step(&mut self, ctx: StepContext<'_>) -> Result<StepEvent, LifecycleError> {
        let StepContext {
            actor,
            input,
            effects,
            dt,
        } = ctx;
        self.check_actor(actor)?;

        match self.phase {
            ActionPhase::Unstarted => {
                self.prepare(actor)?;
                self.advance_input(actor, input, effects)
            }
            ActionPhase::Preparing => self.advance_input(actor, input, effects),
            ActionPhase::OutputPending => {
                self.emit_output(effects)?;
                self.advance_maintain(Tick::ZERO)
            }
            ActionPhase::Maintaining => self.advance_maintain(dt),
            ActionPhase::Finished(terminal) => Err(LifecycleError::AlreadyTerminal { terminal }),
        }
    }

    /// `Unstarted → Preparing`. A refused prep finishes the lifecycle as cancelled.
    pub fn prepare(&mut self, actor: &ActorState) -> Result<(), LifecycleError> {
        self.expect_phase("prepare", ActionPhase::Unstarted)?;
        self.check_actor(actor)?;

        if self.action.prep(actor) {
            self.phase = ActionPhase::Preparing;
            Ok(())
        } else {
            self.finish_cancelled();
            Err(LifecycleError::PrepRejected {
                actor: self.actor,
                name: self.action.name().to_string(),
            })
        }
    }

    /// Polls for input while `Preparing`. When it resolves, charges the cost and
    /// moves to `OutputPending`; returns whether that happened.
    pub fn poll_input(
        &mut self,
        actor: &mut ActorState,
        input: &mut dyn InputSource,
    ) -> Result<bool, LifecycleError> {
        self.expect_phase("poll input", ActionPhase::Preparing)?;
        self.check_actor(actor)?;

        self.polls = self.polls.saturating_add(1);
        if !self.action.handle_input(input) {
            return Ok(false);
        }

        let cost = self.action.cost();
        if !actor.spend_action_points(cost) {
            self.finish_cancelled();
            return Err(LifecycleError::InsufficientActionPoints {
                actor: self.actor,
                cost,
                available: actor.action_points.current,
            });
        }
        self.charged = true;
        self.phase = ActionPhase::OutputPending;
        Ok(true)
    }

    /// `OutputPending → Maintaining`.
    pub fn emit_output(&mut self, effects: &mut dyn EffectSink) -> Result<(), LifecycleError> {
        self.expect_phase("emit output", ActionPhase::OutputPending)?;
        self.action.handle_output(effects);
        self.phase = ActionPhase::Maintaining;
        Ok(())
    }

    /// Advances the maintain phase by `dt`.
    pub fn maintain(&mut self, dt: Tick) -> Result<MaintenanceStatus, LifecycleError> {
        self.expect_phase("maintain", ActionPhase::Maintaining)?;
        let status = self.action.maintain(dt);
        if status.is_complete() {
            self.phase = ActionPhase::Finished(Terminal::Complete);
        }
        Ok(status)
    }

    /// Requests early termination. `Ok(false)` means the action refused and keeps running.
    pub fn interrupt(&mut self) -> Result<bool, LifecycleError> {
        self.ensure_running()?;
        if self.action.interrupt() {
            self.phase = ActionPhase::Finished(Terminal::Interrupted);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Tears the action down immediately, whatever its phase, including after a
    /// refused interrupt.
    pub fn cancel(&mut self) -> Result<(), LifecycleError> {
        self.ensure_running()?;
        self.finish_cancelled();
        Ok(())
    }

    fn advance_input(
        &mut self,
        actor: &mut ActorState,
        input: &mut dyn InputSource,
        effects: &mut dyn EffectSink,
    ) -> Result<StepEvent, LifecycleError> {
        if !self.poll_input(actor, input)? {
            return Ok(StepEvent::AwaitingInput);
        }
        let cost = self.action.cost();
        self.emit_output(effects)?;
        match self.advance_maintain(Tick::ZERO)? {
            StepEvent::InProgress => Ok(StepEvent::Started { cost }),
            event => Ok(event),
        }
    }

    fn advance_maintain(&mut self, dt: Tick) -> Result<StepEvent, LifecycleError> {
        match self.maintain(dt)? {
            MaintenanceStatus::InProgress => Ok(StepEvent::InProgress),
            MaintenanceStatus::Complete => Ok(StepEvent::Completed(self.outcome())),
        }
    }

    fn finish_cancelled(&mut self) {
        self.action.cancel();
        self.phase = ActionPhase::Finished(Terminal::Cancelled);
    }

    fn ensure_running(&self) -> Result<(), LifecycleError> {
        match self.phase.terminal() {
            Some(terminal) => Err(LifecycleError::AlreadyTerminal { terminal }),
            None => Ok(()),
        }
    }

    fn expect_phase(
        &self,
        operation: &'static str,
        expected: ActionPhase,
    ) -> Result<(), LifecycleError> {
        self.ensure_running()?;
        if self.phase == expected {
            Ok(())
        } else {
            Err(LifecycleError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    fn check_actor(&self, actor: &ActorState) -> Result<(), LifecycleError> {
        if actor.id == self.actor {
            Ok(())
        } else {
            Err(LifecycleError::ActorMismatch {
                expected: self.actor,
                found: actor.id,
            })
        }
    }
}

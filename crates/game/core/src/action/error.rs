//! Action registry and lifecycle errors.
//!
//! Load-time problems with individual records are not errors here: they are
//! reported through [`crate::action::RegistrationReport`]. Everything below is
//! returned as a value so one failing action never halts the turn loop.

use crate::action::{ActionFamily, ActionPhase, Terminal};
use crate::env::SourceError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::EntityId;

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors raised while registering families or constructing instances.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// `create_action` was called for a family that was never registered.
    #[error("action family '{family}' is not registered")]
    FamilyNotRegistered { family: ActionFamily },

    /// The variant name has no matching definition in its family.
    #[error("no '{family}' definition named '{name}'")]
    DefinitionNotFound { family: ActionFamily, name: String },

    /// A snapshot's state belongs to a different family than its variant.
    #[error("snapshot state for '{found}' cannot restore a '{family}' action")]
    StateMismatch {
        family: ActionFamily,
        found: ActionFamily,
    },

    /// The backing source failed to load the family at all.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        use RegistryError::*;
        match self {
            FamilyNotRegistered { .. } | DefinitionNotFound { .. } => ErrorSeverity::Validation,
            StateMismatch { .. } => ErrorSeverity::Internal,
            Source(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use RegistryError::*;
        match self {
            FamilyNotRegistered { .. } => "REGISTRY_FAMILY_NOT_REGISTERED",
            DefinitionNotFound { .. } => "REGISTRY_DEFINITION_NOT_FOUND",
            StateMismatch { .. } => "REGISTRY_STATE_MISMATCH",
            Source(err) => err.error_code(),
        }
    }
}

// ============================================================================
// Lifecycle Errors
// ============================================================================

/// Errors raised while stepping an [`crate::action::ActionLifecycle`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The variant cannot be queued directly (reaction-only).
    #[error("'{name}' cannot be queued directly")]
    NotReadyable { name: String },

    /// `prep` refused; the action was cancelled without charging.
    #[error("actor {actor} could not prepare '{name}'")]
    PrepRejected { actor: EntityId, name: String },

    /// The actor could no longer pay when input resolved; the action was cancelled.
    #[error("actor {actor} needs {cost} action points but has {available}")]
    InsufficientActionPoints {
        actor: EntityId,
        cost: u32,
        available: u32,
    },

    /// The acting entity passed to a step is not the one the action was queued for.
    #[error("action queued for {expected} was stepped with actor {found}")]
    ActorMismatch { expected: EntityId, found: EntityId },

    /// An operation was called in a phase that does not accept it.
    #[error("cannot {operation} while {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: ActionPhase,
    },

    /// An operation was attempted after the lifecycle finished.
    #[error("action already finished ({terminal:?})")]
    AlreadyTerminal { terminal: Terminal },
}

impl GameError for LifecycleError {
    fn severity(&self) -> ErrorSeverity {
        use LifecycleError::*;
        match self {
            NotReadyable { .. } => ErrorSeverity::Validation,
            PrepRejected { .. } | InsufficientActionPoints { .. } => ErrorSeverity::Recoverable,
            ActorMismatch { .. } | InvalidPhase { .. } | AlreadyTerminal { .. } => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use LifecycleError::*;
        match self {
            NotReadyable { .. } => "LIFECYCLE_NOT_READYABLE",
            PrepRejected { .. } => "LIFECYCLE_PREP_REJECTED",
            InsufficientActionPoints { .. } => "LIFECYCLE_INSUFFICIENT_ACTION_POINTS",
            ActorMismatch { .. } => "LIFECYCLE_ACTOR_MISMATCH",
            InvalidPhase { .. } => "LIFECYCLE_INVALID_PHASE",
            AlreadyTerminal { .. } => "LIFECYCLE_ALREADY_TERMINAL",
        }
    }
}

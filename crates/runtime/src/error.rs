//! Errors surfaced by the scheduler.
use thiserror::Error;

use game_core::{EntityId, ErrorSeverity, GameError, LifecycleError, RegistryError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("actor {actor} already has '{name}' in flight")]
    ActorBusy { actor: EntityId, name: String },

    #[error("actor {0} has no action in flight")]
    NoActionInFlight(EntityId),

    #[error("actor {actor} gave no input after {polls} polls")]
    InputTimedOut { actor: EntityId, polls: u32 },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ActorNotFound(_) | Self::ActorBusy { .. } | Self::NoActionInFlight(_) => {
                ErrorSeverity::Validation
            }
            Self::InputTimedOut { .. } => ErrorSeverity::Recoverable,
            Self::Registry(e) => e.severity(),
            Self::Lifecycle(e) => e.severity(),
            Self::Repository(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActorNotFound(_) => "RUNTIME_ACTOR_NOT_FOUND",
            Self::ActorBusy { .. } => "RUNTIME_ACTOR_BUSY",
            Self::NoActionInFlight(_) => "RUNTIME_NO_ACTION_IN_FLIGHT",
            Self::InputTimedOut { .. } => "RUNTIME_INPUT_TIMED_OUT",
            Self::Registry(e) => e.error_code(),
            Self::Lifecycle(e) => e.error_code(),
            Self::Repository(_) => "RUNTIME_REPOSITORY",
        }
    }
}

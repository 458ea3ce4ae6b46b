//! Definition source errors.

use crate::action::ActionFamily;
use crate::error::{ErrorSeverity, GameError};

/// A definition source could not produce any records for a family.
///
/// This is the only load-time failure that aborts `register_family`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceError {
    /// The family has no backing data (missing directory, unknown partition).
    #[error("definitions for family '{family}' are unavailable: {reason}")]
    Unavailable {
        family: ActionFamily,
        reason: String,
    },
}

impl GameError for SourceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "SOURCE_UNAVAILABLE",
        }
    }
}

/// A single definition record that failed to parse or validate.
///
/// Registration skips the record and keeps going with the rest of the family.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("malformed '{family}' definition from {origin}: {reason}")]
pub struct MalformedDefinition {
    pub family: ActionFamily,
    /// Where the record came from (file path, or a label for in-memory sources).
    pub origin: String,
    pub reason: String,
}

impl MalformedDefinition {
    pub fn new(family: ActionFamily, origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            family,
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}

impl GameError for MalformedDefinition {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        "SOURCE_MALFORMED_DEFINITION"
    }
}

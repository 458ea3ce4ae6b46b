use std::collections::BTreeMap;

use super::{MalformedDefinition, SourceError};
use crate::action::{ActionDefinition, ActionFamily};

/// One record produced by a [`DefinitionSource`]: either a parsed definition or
/// the reason it could not be parsed.
pub type DefinitionEntry = Result<ActionDefinition, MalformedDefinition>;

/// Backing store of named definition records, partitioned by family.
///
/// Implementations must return every record of the family, including the
/// malformed ones, so registration can report them.
pub trait DefinitionSource {
    fn load_all(&self, family: ActionFamily) -> Result<Vec<DefinitionEntry>, SourceError>;
}

/// In-memory definition source, used for tests and embedded content.
#[derive(Clone, Debug, Default)]
pub struct StaticDefinitionSource {
    families: BTreeMap<ActionFamily, Vec<DefinitionEntry>>,
}

impl StaticDefinitionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition under its own family.
    #[must_use]
    pub fn with(mut self, definition: impl Into<ActionDefinition>) -> Self {
        let definition = definition.into();
        self.families
            .entry(definition.family())
            .or_default()
            .push(Ok(definition));
        self
    }

    /// Adds a broken record to `family`.
    #[must_use]
    pub fn with_malformed(
        mut self,
        family: ActionFamily,
        origin: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.families
            .entry(family)
            .or_default()
            .push(Err(MalformedDefinition::new(family, origin, reason)));
        self
    }

    /// Replaces the records of one family, keeping the others.
    pub fn replace(&mut self, family: ActionFamily, entries: Vec<DefinitionEntry>) {
        self.families.insert(family, entries);
    }
}

impl DefinitionSource for StaticDefinitionSource {
    fn load_all(&self, family: ActionFamily) -> Result<Vec<DefinitionEntry>, SourceError> {
        self.families
            .get(&family)
            .cloned()
            .ok_or_else(|| SourceError::Unavailable {
                family,
                reason: "no records registered".to_string(),
            })
    }
}

//! Action factory registry: family → variant name → constructor.
//!
//! The registry is an owned value passed to whoever needs to build actions.
//! `register_family` takes `&mut self`, so loading or reloading a family can
//! never overlap with `create_action` calls that borrow the registry.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::action::{
    ActionDefinition, ActionFamily, ActionInstance, ActionSnapshot, RegistryError,
};
use crate::env::{DefinitionSource, MalformedDefinition};

/// Builds a fresh instance bound to one variant's definition.
type ActionMaker = Box<dyn Fn() -> ActionInstance + Send + Sync>;

/// Outcome of registering one family.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    pub family: Option<ActionFamily>,
    /// Variant names now available, sorted.
    pub loaded: Vec<String>,
    /// Records that were dropped, with the reason.
    pub skipped: Vec<MalformedDefinition>,
}

#[derive(Default)]
struct FamilyTable {
    definitions: BTreeMap<String, ActionDefinition>,
    makers: BTreeMap<String, ActionMaker>,
}

impl FamilyTable {
    fn insert(&mut self, definition: ActionDefinition) {
        let name = definition.name().to_string();
        let captured = definition.clone();
        self.makers.insert(
            name.clone(),
            Box::new(move || ActionInstance::new(captured.clone())),
        );
        self.definitions.insert(name, definition);
    }
}

/// Owns the constructors for every registered family.
#[derive(Default)]
pub struct ActionRegistry {
    families: HashMap<ActionFamily, FamilyTable>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every record of `family` from `source`, replacing whatever the
    /// family held before.
    ///
    /// Broken, mis-filed, invalid or duplicate records are skipped and listed
    /// in the report. If the source itself fails, the previous contents are
    /// kept and the error is returned.
    pub fn register_family(
        &mut self,
        family: ActionFamily,
        source: &dyn DefinitionSource,
    ) -> Result<RegistrationReport, RegistryError> {
        let entries = source.load_all(family)?;

        let mut table = FamilyTable::default();
        let mut skipped = Vec::new();
        for entry in entries {
            let definition = match entry {
                Ok(definition) => definition,
                Err(malformed) => {
                    skipped.push(malformed);
                    continue;
                }
            };
            let origin = definition.name().to_string();

            if definition.family() != family {
                skipped.push(MalformedDefinition::new(
                    family,
                    origin,
                    format!("record belongs to family '{}'", definition.family()),
                ));
                continue;
            }
            if let Err(reason) = definition.validate() {
                skipped.push(MalformedDefinition::new(family, origin, reason));
                continue;
            }
            if table.definitions.contains_key(definition.name()) {
                skipped.push(MalformedDefinition::new(
                    family,
                    origin,
                    "duplicate variant name",
                ));
                continue;
            }
            table.insert(definition);
        }

        let loaded = table.definitions.keys().cloned().collect();
        self.families.insert(family, table);

        Ok(RegistrationReport {
            family: Some(family),
            loaded,
            skipped,
        })
    }

    /// Drops a family and all of its constructors. Returns false if it was not registered.
    pub fn unregister_family(&mut self, family: ActionFamily) -> bool {
        self.families.remove(&family).is_some()
    }

    pub fn is_registered(&self, family: ActionFamily) -> bool {
        self.families.contains_key(&family)
    }

    /// Registered families, in declaration order.
    pub fn families(&self) -> Vec<ActionFamily> {
        let mut families: Vec<_> = self.families.keys().copied().collect();
        families.sort();
        families
    }

    /// Sorted variant names of `family`; empty if the family is not registered.
    pub fn variants(&self, family: ActionFamily) -> Vec<&str> {
        self.families
            .get(&family)
            .map(|table| table.definitions.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Looks up the shared definition for `name`.
    pub fn definition(
        &self,
        family: ActionFamily,
        name: &str,
    ) -> Result<&ActionDefinition, RegistryError> {
        self.table(family)?
            .definitions
            .get(name)
            .ok_or_else(|| RegistryError::DefinitionNotFound {
                family,
                name: name.to_string(),
            })
    }

    /// Builds a fresh instance of `name`.
    pub fn create_action(
        &self,
        family: ActionFamily,
        name: &str,
    ) -> Result<ActionInstance, RegistryError> {
        let maker = self.table(family)?.makers.get(name).ok_or_else(|| {
            RegistryError::DefinitionNotFound {
                family,
                name: name.to_string(),
            }
        })?;
        Ok(maker())
    }

    /// Rebuilds an instance from its snapshot using the current definition.
    pub fn restore(&self, snapshot: &ActionSnapshot) -> Result<ActionInstance, RegistryError> {
        let mut action = self.create_action(snapshot.family, &snapshot.variant)?;
        action.restore_state(snapshot.state.clone())?;
        Ok(action)
    }

    fn table(&self, family: ActionFamily) -> Result<&FamilyTable, RegistryError> {
        self.families
            .get(&family)
            .ok_or(RegistryError::FamilyNotRegistered { family })
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for family in self.families() {
            map.entry(&family, &self.variants(family));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{
        Action, ActionState, BasicAttackDef, BasicAttackState, DamageKind, MoveDef, UseItemDef,
    };
    use crate::env::{SourceError, StaticDefinitionSource};
    use crate::state::Tick;

    fn attack(name: &str, ap: u32, strength: u32) -> BasicAttackDef {
        BasicAttackDef {
            name: name.into(),
            kind: DamageKind::Physical,
            ap,
            strength,
            range: 1,
            duration: Tick::ZERO,
            effect: None,
            sound: None,
        }
    }

    fn attacks_source() -> StaticDefinitionSource {
        StaticDefinitionSource::new()
            .with(attack("slash", 2, 3))
            .with(attack("stab", 1, 2))
            .with(attack("cleave", 3, 5))
    }

    #[test]
    fn creates_registered_variant() {
        let mut registry = ActionRegistry::new();
        registry
            .register_family(ActionFamily::Attacks, &attacks_source())
            .unwrap();

        let slash = registry
            .create_action(ActionFamily::Attacks, "slash")
            .unwrap();
        assert_eq!(slash.name(), "slash");
        assert_eq!(slash.cost(), 2);
    }

    #[test]
    fn unknown_variant_is_not_found() {
        let mut registry = ActionRegistry::new();
        registry
            .register_family(ActionFamily::Attacks, &attacks_source())
            .unwrap();

        let err = registry
            .create_action(ActionFamily::Attacks, "nonexistent")
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DefinitionNotFound {
                family: ActionFamily::Attacks,
                name: "nonexistent".into(),
            }
        );
    }

    #[test]
    fn unregistered_family_is_reported() {
        let registry = ActionRegistry::new();
        assert_eq!(
            registry.create_action(ActionFamily::Movement, "step"),
            Err(RegistryError::FamilyNotRegistered {
                family: ActionFamily::Movement
            })
        );
    }

    #[test]
    fn unregistering_drops_every_variant() {
        let mut registry = ActionRegistry::new();
        registry
            .register_family(ActionFamily::Attacks, &attacks_source())
            .unwrap();

        assert!(registry.unregister_family(ActionFamily::Attacks));
        assert!(!registry.is_registered(ActionFamily::Attacks));
        assert!(registry.variants(ActionFamily::Attacks).is_empty());
        assert_eq!(
            registry.create_action(ActionFamily::Attacks, "slash"),
            Err(RegistryError::FamilyNotRegistered {
                family: ActionFamily::Attacks
            })
        );
        assert!(!registry.unregister_family(ActionFamily::Attacks));
    }

    #[test]
    fn every_constructor_binds_its_own_definition() {
        let mut registry = ActionRegistry::new();
        registry
            .register_family(ActionFamily::Attacks, &attacks_source())
            .unwrap();

        let names = registry.variants(ActionFamily::Attacks);
        assert_eq!(names, vec!["cleave", "slash", "stab"]);
        for name in names {
            let action = registry.create_action(ActionFamily::Attacks, name).unwrap();
            let expected = registry.definition(ActionFamily::Attacks, name).unwrap();
            assert_eq!(action.name(), name);
            assert!(action.definition().ptr_eq(expected));
        }
    }

    #[test]
    fn instances_share_one_definition() {
        let mut registry = ActionRegistry::new();
        registry
            .register_family(ActionFamily::Attacks, &attacks_source())
            .unwrap();

        let a = registry.create_action(ActionFamily::Attacks, "stab").unwrap();
        let b = registry.create_action(ActionFamily::Attacks, "stab").unwrap();
        assert!(a.definition().ptr_eq(&b.definition()));
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let mut source = attacks_source()
            .with_malformed(ActionFamily::Attacks, "broken.ron", "unexpected token")
            .with(attack("", 1, 1))
            .with(attack("slash", 9, 9));
        let mut entries = source.load_all(ActionFamily::Attacks).unwrap();
        entries.push(Ok(MoveDef {
            name: "stray_step".into(),
            ap: 1,
            range: 1,
            millis_per_tile: 100,
            sound: None,
        }
        .into()));
        source.replace(ActionFamily::Attacks, entries);

        let mut registry = ActionRegistry::new();
        let report = registry
            .register_family(ActionFamily::Attacks, &source)
            .unwrap();

        assert_eq!(report.loaded, vec!["cleave", "slash", "stab"]);
        assert_eq!(report.skipped.len(), 4);
        // The first "slash" wins over the duplicate.
        let slash = registry.create_action(ActionFamily::Attacks, "slash").unwrap();
        assert_eq!(slash.cost(), 2);
    }

    #[test]
    fn reload_replaces_prior_contents() {
        let mut registry = ActionRegistry::new();
        registry
            .register_family(ActionFamily::Attacks, &attacks_source())
            .unwrap();

        let reloaded = StaticDefinitionSource::new().with(attack("slash", 4, 6));
        registry
            .register_family(ActionFamily::Attacks, &reloaded)
            .unwrap();

        assert_eq!(registry.variants(ActionFamily::Attacks), vec!["slash"]);
        let slash = registry.create_action(ActionFamily::Attacks, "slash").unwrap();
        assert_eq!(slash.cost(), 4);
        assert!(registry.create_action(ActionFamily::Attacks, "stab").is_err());
    }

    #[test]
    fn failed_source_keeps_previous_family() {
        let mut registry = ActionRegistry::new();
        registry
            .register_family(ActionFamily::Attacks, &attacks_source())
            .unwrap();

        let empty = StaticDefinitionSource::new();
        let err = registry
            .register_family(ActionFamily::Attacks, &empty)
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Source(SourceError::Unavailable { .. })
        ));
        assert_eq!(registry.variants(ActionFamily::Attacks).len(), 3);
    }

    #[test]
    fn restore_replays_state_on_current_definition() {
        let mut registry = ActionRegistry::new();
        registry
            .register_family(ActionFamily::Attacks, &attacks_source())
            .unwrap();
        registry
            .register_family(
                ActionFamily::Items,
                &StaticDefinitionSource::new().with(UseItemDef {
                    name: "quaff".into(),
                    ap: 1,
                    item: "potion".into(),
                    magnitude: 4,
                    range: 0,
                    readyable: true,
                    interruptible: true,
                    duration: Tick::ZERO,
                    effect: None,
                    sound: None,
                }),
            )
            .unwrap();

        let mut state = BasicAttackState::default();
        state.progress.elapsed = Tick(120);
        let snapshot = ActionSnapshot {
            family: ActionFamily::Attacks,
            variant: "cleave".into(),
            state: ActionState::Attack(state.clone()),
        };
        let restored = registry.restore(&snapshot).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.cost(), 3);

        let mismatched = ActionSnapshot {
            family: ActionFamily::Items,
            variant: "quaff".into(),
            state: ActionState::Attack(state),
        };
        assert_eq!(
            registry.restore(&mismatched),
            Err(RegistryError::StateMismatch {
                family: ActionFamily::Items,
                found: ActionFamily::Attacks,
            })
        );
    }
}

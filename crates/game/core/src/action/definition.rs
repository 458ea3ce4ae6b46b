//! Immutable action definitions shared by every instance of a variant.
//!
//! Definitions are parsed once per family by a [`crate::env::DefinitionSource`],
//! wrapped in an `Arc` at registration and never mutated afterwards.

use std::sync::Arc;

use crate::action::ActionFamily;
use crate::state::Tick;

/// Damage category applied by attacks.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageKind {
    #[default]
    Physical,
    Fire,
    Cold,
    Lightning,
    Poison,
    Arcane,
    /// Damage to composure rather than flesh (fear, panic).
    Mental,
}

/// Single-target attack definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicAttackDef {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: DamageKind,
    /// Action-point cost.
    pub ap: u32,
    pub strength: u32,
    /// Maximum target distance in tiles.
    pub range: u32,
    /// Time spent in the maintain phase. Zero means instant.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Tick,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sound: Option<String>,
}

/// Relocation definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveDef {
    pub name: String,
    pub ap: u32,
    /// Maximum tiles per use.
    pub range: u32,
    pub millis_per_tile: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sound: Option<String>,
}

/// Item consumption definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseItemDef {
    pub name: String,
    pub ap: u32,
    /// Inventory item consumed on completion.
    pub item: String,
    /// Hit points restored to the target.
    pub magnitude: u32,
    /// Maximum target distance. Zero targets the user.
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub readyable: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub interruptible: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Tick,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sound: Option<String>,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

/// A registered definition of any family.
///
/// Cloning is cheap; all clones point at the same shared parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionDefinition {
    Attack(Arc<BasicAttackDef>),
    Movement(Arc<MoveDef>),
    Item(Arc<UseItemDef>),
}

impl ActionDefinition {
    pub fn family(&self) -> ActionFamily {
        match self {
            Self::Attack(_) => ActionFamily::Attacks,
            Self::Movement(_) => ActionFamily::Movement,
            Self::Item(_) => ActionFamily::Items,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Attack(def) => &def.name,
            Self::Movement(def) => &def.name,
            Self::Item(def) => &def.name,
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            Self::Attack(def) => def.ap,
            Self::Movement(def) => def.ap,
            Self::Item(def) => def.ap,
        }
    }

    /// True if both values share the same underlying allocation.
    pub fn ptr_eq(&self, other: &ActionDefinition) -> bool {
        match (self, other) {
            (Self::Attack(a), Self::Attack(b)) => Arc::ptr_eq(a, b),
            (Self::Movement(a), Self::Movement(b)) => Arc::ptr_eq(a, b),
            (Self::Item(a), Self::Item(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Checks the invariants a parsed record must satisfy before registration.
    pub fn validate(&self) -> Result<(), String> {
        if self.name().trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        match self {
            Self::Attack(_) => Ok(()),
            Self::Movement(def) if def.range == 0 => {
                Err("movement range must be at least one tile".to_string())
            }
            Self::Movement(_) => Ok(()),
            Self::Item(def) if def.item.trim().is_empty() => {
                Err("item name must not be empty".to_string())
            }
            Self::Item(_) => Ok(()),
        }
    }
}

impl From<BasicAttackDef> for ActionDefinition {
    fn from(def: BasicAttackDef) -> Self {
        Self::Attack(Arc::new(def))
    }
}

impl From<MoveDef> for ActionDefinition {
    fn from(def: MoveDef) -> Self {
        Self::Movement(Arc::new(def))
    }
}

impl From<UseItemDef> for ActionDefinition {
    fn from(def: UseItemDef) -> Self {
        Self::Item(Arc::new(def))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step() -> MoveDef {
        MoveDef {
            name: "step".into(),
            ap: 1,
            range: 1,
            millis_per_tile: 200,
            sound: None,
        }
    }

    #[test]
    fn validate_rejects_empty_name() {
        let def = ActionDefinition::from(MoveDef {
            name: "  ".into(),
            ..step()
        });
        assert!(def.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_range_movement() {
        let def = ActionDefinition::from(MoveDef { range: 0, ..step() });
        assert!(def.validate().is_err());
        assert!(ActionDefinition::from(step()).validate().is_ok());
    }

    #[test]
    fn clones_share_allocation() {
        let def = ActionDefinition::from(step());
        let other = ActionDefinition::from(step());
        assert!(def.ptr_eq(&def.clone()));
        assert!(!def.ptr_eq(&other));
        assert_eq!(def, other);
    }
}

//! Action definition loader.
//!
//! Each family lives in its own directory under the actions root, one RON file
//! per variant:
//!
//! ```text
//! actions/
//! ├── attacks/
//! │   ├── slash.ron
//! │   └── fire_bolt.ron
//! ├── movement/
//! │   └── stride.ron
//! └── items/
//!     └── quaff_potion.ron
//! ```

use std::path::{Path, PathBuf};

use game_core::{
    ActionDefinition, ActionFamily, BasicAttackDef, DefinitionEntry, DefinitionSource,
    MalformedDefinition, MoveDef, SourceError, UseItemDef,
};

use crate::loaders::{LoadResult, read_file};

/// File extension of definition records.
const EXTENSION: &str = "ron";

/// Parses single definition records.
pub struct ActionLoader;

impl ActionLoader {
    /// Parses `content` as a definition of `family`.
    pub fn parse(family: ActionFamily, content: &str) -> LoadResult<ActionDefinition> {
        let definition: ActionDefinition = match family {
            ActionFamily::Attacks => ron::from_str::<BasicAttackDef>(content).map(Into::into),
            ActionFamily::Movement => ron::from_str::<MoveDef>(content).map(Into::into),
            ActionFamily::Items => ron::from_str::<UseItemDef>(content).map(Into::into),
        }
        .map_err(|e| anyhow::anyhow!("Failed to parse {} definition: {}", family, e))?;

        Ok(definition)
    }

    /// Loads and parses one definition file.
    pub fn load(family: ActionFamily, path: &Path) -> LoadResult<ActionDefinition> {
        let content = read_file(path)?;
        Self::parse(family, &content)
    }
}

/// Definition source backed by a directory tree of RON files.
#[derive(Clone, Debug)]
pub struct RonDefinitionSource {
    root: PathBuf,
}

impl RonDefinitionSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the records of `family`.
    pub fn family_dir(&self, family: ActionFamily) -> PathBuf {
        self.root.join(family.as_ref())
    }

    /// Definition files of `family`, sorted by path so load order is stable.
    fn record_paths(&self, family: ActionFamily) -> Result<Vec<PathBuf>, SourceError> {
        let dir = self.family_dir(family);
        let entries = std::fs::read_dir(&dir).map_err(|e| SourceError::Unavailable {
            family,
            reason: format!("{}: {}", dir.display(), e),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .collect();
        paths.sort();
        Ok(paths)
    }
}

impl DefinitionSource for RonDefinitionSource {
    fn load_all(&self, family: ActionFamily) -> Result<Vec<DefinitionEntry>, SourceError> {
        let paths = self.record_paths(family)?;
        tracing::debug!(
            "Loading {} {} definition file(s) from {}",
            paths.len(),
            family,
            self.family_dir(family).display()
        );

        let entries = paths
            .into_iter()
            .map(|path| {
                ActionLoader::load(family, &path).map_err(|e| {
                    MalformedDefinition::new(family, path.display().to_string(), format!("{e:#}"))
                })
            })
            .collect();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{DamageKind, Tick};

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).expect("write fixture");
    }

    #[test]
    fn parses_attack_with_defaults() {
        let def = ActionLoader::parse(
            ActionFamily::Attacks,
            r#"(name: "slash", kind: Fire, ap: 2, strength: 3, range: 1)"#,
        )
        .expect("parse attack");

        let ActionDefinition::Attack(attack) = def else {
            panic!("expected attack definition");
        };
        assert_eq!(attack.name, "slash");
        assert_eq!(attack.kind, DamageKind::Fire);
        assert_eq!(attack.duration, Tick::ZERO);
        assert_eq!(attack.effect, None);
    }

    #[test]
    fn item_flags_default_to_true() {
        let def = ActionLoader::parse(
            ActionFamily::Items,
            r#"(name: "quaff", ap: 1, item: "potion", magnitude: 5)"#,
        )
        .expect("parse item");

        let ActionDefinition::Item(item) = def else {
            panic!("expected item definition");
        };
        assert!(item.readyable);
        assert!(item.interruptible);
        assert_eq!(item.range, 0);
    }

    #[test]
    fn loads_directory_and_reports_broken_files() {
        let root = tempfile::tempdir().expect("tempdir");
        let attacks = root.path().join("attacks");
        std::fs::create_dir_all(&attacks).unwrap();
        write(
            &attacks,
            "slash.ron",
            r#"(name: "slash", ap: 2, strength: 3, range: 1)"#,
        );
        write(&attacks, "broken.ron", r#"(name: "oops", ap: )"#);
        write(&attacks, "notes.txt", "ignored");

        let source = RonDefinitionSource::new(root.path());
        let entries = source.load_all(ActionFamily::Attacks).expect("load");
        assert_eq!(entries.len(), 2);

        // Sorted by path: broken.ron before slash.ron.
        let broken = entries[0].as_ref().unwrap_err();
        assert_eq!(broken.family, ActionFamily::Attacks);
        assert!(broken.origin.ends_with("broken.ron"));
        assert_eq!(entries[1].as_ref().map(|def| def.name()), Ok("slash"));
    }

    #[test]
    fn missing_family_directory_is_unavailable() {
        let root = tempfile::tempdir().expect("tempdir");
        let source = RonDefinitionSource::new(root.path());
        assert!(matches!(
            source.load_all(ActionFamily::Movement),
            Err(SourceError::Unavailable {
                family: ActionFamily::Movement,
                ..
            })
        ));
    }
}

//! Content factory for building registries from data files.

use std::path::{Path, PathBuf};

use game_core::{ActionFamily, ActionRegistry, GameConfig, RegistrationReport};

use crate::loaders::{ConfigLoader, LoadResult, RonDefinitionSource};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── actions/
///     ├── attacks/*.ron
///     ├── movement/*.ron
///     └── items/*.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Definition source rooted at `actions/`.
    pub fn action_source(&self) -> RonDefinitionSource {
        RonDefinitionSource::new(self.data_dir.join("actions"))
    }

    /// (Re)loads one family into `registry`.
    ///
    /// Skipped records are logged and returned in the report; only a missing
    /// family directory is an error.
    pub fn register_family(
        &self,
        registry: &mut ActionRegistry,
        family: ActionFamily,
    ) -> LoadResult<RegistrationReport> {
        let report = registry
            .register_family(family, &self.action_source())
            .map_err(|e| anyhow::anyhow!("Failed to register {} actions: {}", family, e))?;

        for skipped in &report.skipped {
            tracing::warn!(
                family = %skipped.family,
                origin = %skipped.origin,
                "Skipping action definition: {}",
                skipped.reason
            );
        }
        tracing::info!(
            "Registered {} {} action(s), skipped {}",
            report.loaded.len(),
            family,
            report.skipped.len()
        );

        Ok(report)
    }

    /// Registers every family. Stops at the first family that cannot be loaded.
    pub fn register_actions(
        &self,
        registry: &mut ActionRegistry,
    ) -> LoadResult<Vec<RegistrationReport>> {
        ActionFamily::ALL
            .into_iter()
            .map(|family| self.register_family(registry, family))
            .collect()
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::Action;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(
            factory.action_source().root(),
            Path::new("/tmp/data/actions")
        );
    }

    #[test]
    fn bundled_content_registers_every_family() {
        let factory = ContentFactory::bundled();
        let mut registry = ActionRegistry::new();
        let reports = factory.register_actions(&mut registry).unwrap();

        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|report| report.skipped.is_empty()));
        assert_eq!(registry.families(), ActionFamily::ALL.to_vec());

        let slash = registry
            .create_action(ActionFamily::Attacks, "slash")
            .unwrap();
        assert_eq!(slash.cost(), 2);
        assert!(registry.create_action(ActionFamily::Movement, "stride").is_ok());
        assert!(registry
            .create_action(ActionFamily::Items, "quaff_potion")
            .is_ok());
    }

    #[test]
    fn bundled_config_matches_defaults() {
        let config = ContentFactory::bundled().load_config().unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn missing_family_fails_registration() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("actions/attacks")).unwrap();
        std::fs::write(
            dir.path().join("actions/attacks/jab.ron"),
            r#"(name: "jab", ap: 1, strength: 1, range: 1)"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        let mut registry = ActionRegistry::new();
        let report = factory
            .register_family(&mut registry, ActionFamily::Attacks)
            .unwrap();
        assert_eq!(report.loaded, vec!["jab"]);

        assert!(factory.register_actions(&mut registry).is_err());
        // Attacks were reloaded before movement failed.
        assert_eq!(registry.variants(ActionFamily::Attacks), vec!["jab"]);
        assert!(!registry.is_registered(ActionFamily::Movement));
    }
}

//! File-based SnapshotRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::repository::{RepositoryError, Result, SnapshotRepository};
use crate::scheduler::SchedulerSnapshot;

/// Stores each slot as `actions_{slot}.bin` in bincode format.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// never leaves a half-written slot behind.
pub struct FileSnapshotRepository {
    base_dir: PathBuf,
}

impl FileSnapshotRepository {
    /// Create a repository rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn slot_path(&self, slot: u64) -> PathBuf {
        self.base_dir.join(format!("actions_{}.bin", slot))
    }
}

impl SnapshotRepository for FileSnapshotRepository {
    fn save(&self, slot: u64, snapshot: &SchedulerSnapshot) -> Result<()> {
        let path = self.slot_path(slot);
        let temp_path = path.with_extension("bin.tmp");

        let bytes = bincode::serialize(snapshot)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(
            "Saved {} in-flight action(s) to slot {} at {}",
            snapshot.actions.len(),
            slot,
            path.display()
        );

        Ok(())
    }

    fn load(&self, slot: u64) -> Result<Option<SchedulerSnapshot>> {
        let path = self.slot_path(slot);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let snapshot: SchedulerSnapshot = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!("Loaded slot {} from {}", slot, path.display());

        Ok(Some(snapshot))
    }

    fn exists(&self, slot: u64) -> bool {
        self.slot_path(slot).exists()
    }

    fn delete(&self, slot: u64) -> Result<()> {
        let path = self.slot_path(slot);

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted slot {}", slot);
        }

        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<u64>> {
        let mut slots = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(slot) = filename
                    .strip_prefix("actions_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && let Ok(slot) = slot.parse::<u64>()
            {
                slots.push(slot);
            }
        }

        slots.sort_unstable();
        Ok(slots)
    }
}

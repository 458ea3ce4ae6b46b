use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::repository::{RepositoryError, Result, SnapshotRepository};
use crate::scheduler::SchedulerSnapshot;

/// In-memory implementation of SnapshotRepository.
#[derive(Default)]
pub struct InMemorySnapshotRepository {
    slots: RwLock<BTreeMap<u64, SchedulerSnapshot>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotRepository for InMemorySnapshotRepository {
    fn save(&self, slot: u64, snapshot: &SchedulerSnapshot) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.insert(slot, snapshot.clone());
        Ok(())
    }

    fn load(&self, slot: u64) -> Result<Option<SchedulerSnapshot>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.get(&slot).cloned())
    }

    fn exists(&self, slot: u64) -> bool {
        self.slots
            .read()
            .map(|slots| slots.contains_key(&slot))
            .unwrap_or(false)
    }

    fn delete(&self, slot: u64) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.remove(&slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<u64>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.keys().copied().collect())
    }
}

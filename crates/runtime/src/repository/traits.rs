use crate::repository::Result;
use crate::scheduler::SchedulerSnapshot;

/// Save slots for scheduler snapshots.
pub trait SnapshotRepository: Send + Sync {
    fn save(&self, slot: u64, snapshot: &SchedulerSnapshot) -> Result<()>;

    /// Returns `None` if nothing was saved in `slot`.
    fn load(&self, slot: u64) -> Result<Option<SchedulerSnapshot>>;

    fn exists(&self, slot: u64) -> bool;

    fn delete(&self, slot: u64) -> Result<()>;

    /// Occupied slots in ascending order.
    fn list_slots(&self) -> Result<Vec<u64>>;
}

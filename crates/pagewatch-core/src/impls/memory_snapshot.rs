//! In-memory snapshot store implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{RecordId, Status};
use crate::ports::SnapshotStore;

/// In-memory snapshot of last-observed statuses.
///
/// Design:
/// - This is the single source of truth for "what did we see last".
/// - Entries live for the lifetime of the process; nothing is persisted.
/// - The mutex guards short, synchronous map operations only (no await
///   happens while it is held).
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    entries: Mutex<HashMap<RecordId, Status>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stored status for `id`, if any (for observability/tests).
    pub fn get(&self, id: &RecordId) -> Option<Status> {
        self.entries.lock().expect("snapshot lock poisoned").get(id).cloned()
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("snapshot lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn previous_or_seed(&self, id: &RecordId, current: &Status) -> Status {
        let mut entries = self.entries.lock().expect("snapshot lock poisoned");
        entries
            .entry(id.clone())
            .or_insert_with(|| current.clone())
            .clone()
    }

    fn set(&self, id: &RecordId, status: Status) {
        let mut entries = self.entries.lock().expect("snapshot lock poisoned");
        entries.insert(id.clone(), status);
    }
}

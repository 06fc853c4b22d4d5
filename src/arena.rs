use std::sync::Mutex;

use crate::record::BusinessRecord;

/// Handle to a record owned by a [`RecordArena`]. Jobs hold handles, never
/// references; the decode → mine → enrich chain hands the handle from parent
/// to child, so at most one job touches a record at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordHandle(usize);

/// Owns every record produced during a run. Records are inserted once by the
/// decoder and mutated through [`RecordArena::with_record`]; they are only
/// taken out when the run is over.
#[derive(Debug, Default)]
pub struct RecordArena {
    records: Mutex<Vec<BusinessRecord>>,
}

impl RecordArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: BusinessRecord) -> RecordHandle {
        let mut records = self.records.lock().unwrap();
        records.push(record);
        RecordHandle(records.len() - 1)
    }

    /// Runs `f` against the record behind `handle`. Returns `None` when the
    /// handle does not belong to this arena.
    pub fn with_record<R>(
        &self,
        handle: RecordHandle,
        f: impl FnOnce(&mut BusinessRecord) -> R,
    ) -> Option<R> {
        let mut records = self.records.lock().unwrap();
        records.get_mut(handle.0).map(f)
    }

    pub fn get(&self, handle: RecordHandle) -> Option<BusinessRecord> {
        self.records.lock().unwrap().get(handle.0).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clones out all records in insertion order.
    pub fn snapshot(&self) -> Vec<BusinessRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Consumes the arena, yielding records in insertion order.
    pub fn into_records(self) -> Vec<BusinessRecord> {
        self.records.into_inner().unwrap()
    }
}

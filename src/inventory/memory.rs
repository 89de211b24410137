use crate::error::Error;
use crate::inventory::InventorySource;
use crate::model::{FileRecord, SourceTag};
use std::collections::HashMap;

/// Synthetic in-memory inventory. Used by tests and dry runs; a source with
/// no entry behaves as unreachable, which is how availability
/// failures are simulated.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    snapshots: HashMap<SourceTag, Vec<FileRecord>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: SourceTag, records: Vec<FileRecord>) -> Self {
        self.snapshots.insert(source, records);
        self
    }

    pub fn insert(&mut self, source: SourceTag, records: Vec<FileRecord>) {
        self.snapshots.insert(source, records);
    }
}

impl InventorySource for MemoryInventory {
    fn load(&self, source: SourceTag) -> Result<Vec<FileRecord>, Error> {
        self.snapshots
            .get(&source)
            .cloned()
            .ok_or_else(|| Error::unavailable(source, "no snapshot registered"))
    }
}

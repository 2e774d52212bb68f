use std::sync::RwLock;

use etacast_common::delivery::record::DeliveryRecord;
use etacast_common::error::StoreError;
use etacast_common::store::RecordStore;

use super::upsert;

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<DeliveryRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, assigning ids to records that have none.
    pub fn with_records(records: impl IntoIterator<Item = DeliveryRecord>) -> Self {
        let mut stored = Vec::new();
        for record in records {
            upsert(&mut stored, record);
        }
        Self {
            records: RwLock::new(stored),
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn find_all(&self) -> Result<Vec<DeliveryRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.clone())
    }

    fn save(&self, record: DeliveryRecord) -> Result<DeliveryRecord, StoreError> {
        record.validate()?;
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        Ok(upsert(&mut records, record))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

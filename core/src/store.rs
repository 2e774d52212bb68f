//! Concrete [`RecordStore`](etacast_common::store::RecordStore) adapters.
//!
//! * [`MemoryRecordStore`]: process-local, used by tests and one-shot runs.
//! * [`JsonLinesRecordStore`]: one JSON record per line in a plain file.

mod jsonl;
mod memory;

pub use jsonl::JsonLinesRecordStore;
pub use memory::MemoryRecordStore;

use etacast_common::delivery::record::DeliveryRecord;

/// Assigns the next free id if the record has none, then inserts or replaces it.
pub(crate) fn upsert(
    records: &mut Vec<DeliveryRecord>,
    mut record: DeliveryRecord,
) -> DeliveryRecord {
    match record.id {
        Some(id) => {
            if let Some(slot) = records.iter_mut().find(|r| r.id == Some(id)) {
                *slot = record.clone();
                return record;
            }
        }
        None => {
            let next = records.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
            record.id = Some(next);
        }
    }
    records.push(record.clone());
    record
}

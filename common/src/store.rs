use crate::delivery::record::DeliveryRecord;
use crate::error::StoreError;

/// Defines the contract for reading and writing historical delivery records.
///
/// Implementations must be safe to share between threads: analytics scans
/// may run concurrently with each other.
pub trait RecordStore: Send + Sync {
    /// Returns every stored record in insertion order.
    ///
    /// The order must be stable between calls as long as no record is added,
    /// since analytics caps and tie-breaks depend on it.
    fn find_all(&self) -> Result<Vec<DeliveryRecord>, StoreError>;

    /// Persists the record's current field values.
    ///
    /// # Returns
    /// * The stored record, with an id assigned if it had none.
    ///
    /// Saving a record whose id already exists replaces it in place.
    fn save(&self, record: DeliveryRecord) -> Result<DeliveryRecord, StoreError>;

    fn find_by_id(&self, id: u64) -> Result<DeliveryRecord, StoreError> {
        self.find_all()?
            .into_iter()
            .find(|record| record.id == Some(id))
            .ok_or(StoreError::NotFound(id))
    }
}

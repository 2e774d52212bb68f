use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use etacast_common::delivery::record::DeliveryRecord;
use etacast_core::store::MemoryRecordStore;

pub fn opened() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 2, 14)
        .unwrap()
        .and_hms_opt(19, 0, 0)
        .unwrap()
}

/// A delivered order whose duration follows its features with a little noise.
pub fn delivered(i: usize, market: Option<i32>) -> DeliveryRecord {
    let items = 1 + (i % 5) as u32;
    let subtotal = 800.0 + 350.0 * (i % 7) as f64 + 10.0 * i as f64;
    let duration = 5.0 + ((i * 7) % 23) as f64;
    let minutes = 12 + 2 * duration as i64 + 3 * items as i64 + (i % 4) as i64;

    let mut builder = DeliveryRecord::builder(opened())
        .total_items(items)
        .subtotal(subtotal)
        .driving_duration(duration)
        .delivered_at(opened() + Duration::minutes(minutes));
    if let Some(market) = market {
        builder = builder.market_id(market);
    }
    builder.build().unwrap()
}

/// `n` delivered records cycling through markets 1 to 3.
pub fn history(n: usize) -> Vec<DeliveryRecord> {
    (0..n).map(|i| delivered(i, Some(1 + (i % 3) as i32))).collect()
}

pub fn pending(market: i32, duration: f64) -> DeliveryRecord {
    DeliveryRecord::builder(opened())
        .market_id(market)
        .total_items(2)
        .subtotal(1500.0)
        .driving_duration(duration)
        .build()
        .unwrap()
}

pub fn memory_store(records: Vec<DeliveryRecord>) -> Arc<MemoryRecordStore> {
    Arc::new(MemoryRecordStore::with_records(records))
}

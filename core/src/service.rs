//! # Prediction Service
//!
//! The use cases an operator surface drives: scoring a delivery, recording an
//! estimate, listing what was recorded and closing a delivery once it arrives.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime, TimeDelta};
use etacast_common::delivery::kind::ModelKind;
use etacast_common::delivery::record::DeliveryRecord;
use etacast_common::error::{PredictionError, ServiceError, StoreError};
use etacast_common::store::RecordStore;
use etacast_common::{debug, success};

use crate::registry::ModelRegistry;

/// The fields a caller supplies when asking for an estimate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionRequest {
    pub market_id: Option<i32>,
    pub category: Option<String>,
    pub total_items: Option<u32>,
    pub subtotal: Option<f64>,
    pub driving_duration: Option<f64>,
}

impl PredictionRequest {
    fn into_record(self, created_at: NaiveDateTime) -> Result<DeliveryRecord, ServiceError> {
        let mut builder = DeliveryRecord::builder(created_at);
        if let Some(market) = self.market_id {
            builder = builder.market_id(market);
        }
        if let Some(category) = self.category {
            builder = builder.category(category);
        }
        if let Some(items) = self.total_items {
            builder = builder.total_items(items);
        }
        if let Some(subtotal) = self.subtotal {
            builder = builder.subtotal(subtotal);
        }
        if let Some(duration) = self.driving_duration {
            builder = builder.driving_duration(duration);
        }
        Ok(builder.build()?)
    }
}

/// A recorded estimate and the record it was stored as.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub kind: ModelKind,
    pub minutes: f64,
    pub record: DeliveryRecord,
}

pub struct PredictionService {
    registry: Arc<ModelRegistry>,
    store: Arc<dyn RecordStore>,
}

impl PredictionService {
    pub fn new(registry: Arc<ModelRegistry>, store: Arc<dyn RecordStore>) -> Self {
        Self { registry, store }
    }

    pub fn predict(
        &self,
        kind: ModelKind,
        record: &DeliveryRecord,
    ) -> Result<f64, PredictionError> {
        self.registry.predict(kind, record)
    }

    /// Scores a request as if it were placed now, without storing anything.
    pub fn preview(
        &self,
        kind: ModelKind,
        request: PredictionRequest,
    ) -> Result<f64, ServiceError> {
        let record = request.into_record(now())?;
        Ok(self.registry.predict(kind, &record)?)
    }

    pub fn estimate(
        &self,
        kind: ModelKind,
        request: PredictionRequest,
    ) -> Result<Estimate, ServiceError> {
        self.estimate_at(kind, request, now())
    }

    /// Predicts with `kind` and stores the record with its delivery time set
    /// to `created_at` plus the whole minutes of the estimate.
    ///
    /// An estimate that cannot be expressed as a delivery time stores nothing.
    pub fn estimate_at(
        &self,
        kind: ModelKind,
        request: PredictionRequest,
        created_at: NaiveDateTime,
    ) -> Result<Estimate, ServiceError> {
        let mut record = request.into_record(created_at)?;
        let minutes = self.registry.predict(kind, &record)?;

        let delivered_at = delivery_time(created_at, minutes)
            .ok_or(PredictionError::Unrecordable { model: kind, minutes })?;
        record.complete(delivered_at)?;

        let record = self.save_prediction(record)?;
        debug!("Recorded {kind} estimate of {minutes:.2} minutes as {:?}", record.id);

        Ok(Estimate {
            kind,
            minutes,
            record,
        })
    }

    pub fn get_all_predictions(&self) -> Result<Vec<DeliveryRecord>, StoreError> {
        self.store.find_all()
    }

    pub fn save_prediction(&self, record: DeliveryRecord) -> Result<DeliveryRecord, StoreError> {
        self.store.save(record)
    }

    pub fn complete_delivery(
        &self,
        id: u64,
        at: NaiveDateTime,
    ) -> Result<DeliveryRecord, ServiceError> {
        complete_delivery(self.store.as_ref(), id, at)
    }
}

/// Marks a stored delivery as arrived at `at`.
///
/// Needs no trained models, so it works on a store that cannot train yet.
pub fn complete_delivery(
    store: &dyn RecordStore,
    id: u64,
    at: NaiveDateTime,
) -> Result<DeliveryRecord, ServiceError> {
    let mut record = store.find_by_id(id)?;
    record.complete(at)?;
    let record = store.save(record)?;
    success!("Completed delivery {id}");
    Ok(record)
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn delivery_time(created_at: NaiveDateTime, minutes: f64) -> Option<NaiveDateTime> {
    if !minutes.is_finite() || minutes < 0.0 || minutes > i64::MAX as f64 {
        return None;
    }
    let elapsed = TimeDelta::try_minutes(minutes.trunc() as i64)?;
    created_at.checked_add_signed(elapsed)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

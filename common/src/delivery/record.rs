//! # Delivery Record
//!
//! A delivery record is created when an order is placed, completed exactly once
//! when the outcome is known, and immutable afterwards.
//!
//! Numeric defaults (order protocol 1, one distinct item, zero prices, one
//! courier on shift, nobody busy, nothing outstanding) apply only to fields
//! left unset at construction, both through [`DeliveryRecordBuilder`] and when
//! deserializing a stored record with absent keys.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{PredictionError, RecordError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    /// Assigned by the record store on first save.
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub market_id: Option<i32>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub actual_delivery_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub store_primary_category: Option<String>,
    #[serde(default = "default_order_protocol")]
    pub order_protocol: u32,
    #[serde(default)]
    pub total_items: Option<u32>,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default = "default_num_distinct_items")]
    pub num_distinct_items: u32,
    #[serde(default)]
    pub min_item_price: f64,
    #[serde(default)]
    pub max_item_price: f64,
    #[serde(default = "default_total_onshift_dashers")]
    pub total_onshift_dashers: u32,
    #[serde(default)]
    pub total_busy_dashers: u32,
    #[serde(default)]
    pub total_outstanding_orders: u32,
    /// Estimated store-to-consumer driving duration, in minutes.
    #[serde(default)]
    pub estimated_driving_duration: Option<f64>,
}

fn default_order_protocol() -> u32 {
    1
}

fn default_num_distinct_items() -> u32 {
    1
}

fn default_total_onshift_dashers() -> u32 {
    1
}

impl DeliveryRecord {
    pub fn builder(created_at: NaiveDateTime) -> DeliveryRecordBuilder {
        DeliveryRecordBuilder::new(created_at)
    }

    pub fn is_delivered(&self) -> bool {
        self.actual_delivery_time.is_some()
    }

    /// Records the observed delivery time.
    ///
    /// A record can only be completed once, and never before it was created.
    pub fn complete(&mut self, delivered_at: NaiveDateTime) -> Result<(), RecordError> {
        if let Some(at) = self.actual_delivery_time {
            return Err(RecordError::AlreadyDelivered { id: self.id, at });
        }
        if delivered_at < self.created_at {
            return Err(RecordError::DeliveredBeforeCreated {
                created: self.created_at,
                delivered: delivered_at,
            });
        }
        self.actual_delivery_time = Some(delivered_at);
        Ok(())
    }

    /// Checks the rules every stored record must satisfy: a non-negative
    /// driving duration and no delivery before creation.
    pub fn validate(&self) -> Result<(), RecordError> {
        if let Some(duration) = self.estimated_driving_duration {
            if duration < 0.0 {
                return Err(RecordError::NegativeDrivingDuration(duration));
            }
        }
        if let Some(delivered) = self.actual_delivery_time {
            if delivered < self.created_at {
                return Err(RecordError::DeliveredBeforeCreated {
                    created: self.created_at,
                    delivered,
                });
            }
        }
        Ok(())
    }

    /// Whole minutes elapsed between creation and delivery, truncated toward zero.
    pub fn actual_minutes(&self) -> Result<f64, PredictionError> {
        let delivered = self
            .actual_delivery_time
            .ok_or(PredictionError::Undelivered)?;
        Ok((delivered - self.created_at).num_minutes() as f64)
    }

    pub fn driving_duration(&self) -> Result<f64, PredictionError> {
        let duration = self
            .estimated_driving_duration
            .ok_or(PredictionError::MissingField("estimatedDrivingDuration"))?;
        if !duration.is_finite() {
            return Err(PredictionError::NonFiniteDuration(duration));
        }
        if duration < 0.0 {
            return Err(PredictionError::NegativeDuration(duration));
        }
        Ok(duration)
    }

    pub fn item_count(&self) -> Result<f64, PredictionError> {
        self.total_items
            .map(f64::from)
            .ok_or(PredictionError::MissingField("totalItems"))
    }

    pub fn subtotal_amount(&self) -> Result<f64, PredictionError> {
        match self.subtotal {
            Some(subtotal) if subtotal.is_finite() => Ok(subtotal),
            _ => Err(PredictionError::MissingField("subtotal")),
        }
    }
}

/// Builds a [`DeliveryRecord`], filling defaults for anything left unset.
#[derive(Debug, Clone)]
pub struct DeliveryRecordBuilder {
    record: DeliveryRecord,
}

impl DeliveryRecordBuilder {
    fn new(created_at: NaiveDateTime) -> Self {
        Self {
            record: DeliveryRecord {
                id: None,
                market_id: None,
                created_at,
                actual_delivery_time: None,
                store_primary_category: None,
                order_protocol: default_order_protocol(),
                total_items: None,
                subtotal: None,
                num_distinct_items: default_num_distinct_items(),
                min_item_price: 0.0,
                max_item_price: 0.0,
                total_onshift_dashers: default_total_onshift_dashers(),
                total_busy_dashers: 0,
                total_outstanding_orders: 0,
                estimated_driving_duration: None,
            },
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.record.id = Some(id);
        self
    }

    pub fn market_id(mut self, market_id: i32) -> Self {
        self.record.market_id = Some(market_id);
        self
    }

    pub fn delivered_at(mut self, at: NaiveDateTime) -> Self {
        self.record.actual_delivery_time = Some(at);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.record.store_primary_category = Some(category.into());
        self
    }

    pub fn order_protocol(mut self, protocol: u32) -> Self {
        self.record.order_protocol = protocol;
        self
    }

    pub fn total_items(mut self, items: u32) -> Self {
        self.record.total_items = Some(items);
        self
    }

    pub fn subtotal(mut self, subtotal: f64) -> Self {
        self.record.subtotal = Some(subtotal);
        self
    }

    pub fn num_distinct_items(mut self, items: u32) -> Self {
        self.record.num_distinct_items = items;
        self
    }

    pub fn item_price_range(mut self, min: f64, max: f64) -> Self {
        self.record.min_item_price = min;
        self.record.max_item_price = max;
        self
    }

    pub fn dashers(mut self, on_shift: u32, busy: u32) -> Self {
        self.record.total_onshift_dashers = on_shift;
        self.record.total_busy_dashers = busy;
        self
    }

    pub fn outstanding_orders(mut self, orders: u32) -> Self {
        self.record.total_outstanding_orders = orders;
        self
    }

    pub fn driving_duration(mut self, minutes: f64) -> Self {
        self.record.estimated_driving_duration = Some(minutes);
        self
    }

    pub fn build(self) -> Result<DeliveryRecord, RecordError> {
        self.record.validate()?;
        Ok(self.record)
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

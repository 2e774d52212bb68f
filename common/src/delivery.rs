//! # Delivery Models
//!
//! * [`record::DeliveryRecord`]: one order's feature snapshot plus its optional observed outcome.
//! * [`kind::ModelKind`]: the three competing strategies that predict delivery minutes.

pub mod kind;
pub mod record;

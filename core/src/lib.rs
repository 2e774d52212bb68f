//! # Etacast Core
//!
//! Delivery-time prediction and the analytics built on top of it.
//!
//! * **[`regression`]**: the three models and their shared contract.
//! * **[`snapshot`]**: on-disk persistence of the fitted simple model.
//! * **[`registry`]**: one-shot initialization of every model.
//! * **[`service`]**: prediction and record-keeping use cases.
//! * **[`analytics`]**: accuracy and traffic-impact reports over stored records.
//! * **[`store`]**: the [`RecordStore`](etacast_common::store::RecordStore) adapters.

pub mod analytics;
pub mod registry;
pub mod regression;
pub mod service;
pub mod snapshot;
pub mod store;

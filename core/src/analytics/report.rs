//! Typed analytics reports.
//!
//! Field names serialize in camelCase (`modelBasedPredictions`,
//! `sampleSize`, `ratioToActual`, ...), which is the shape `--json` prints.

use std::collections::BTreeMap;

use etacast_common::delivery::kind::{ModelKind, PerModel};
use etacast_common::error::AggregationError;
use serde::{Serialize, Serializer};

pub const TRAFFIC_NOTE: &str = "Traffic impact is the ratio of actual delivery time to \
    estimated delivery time. Values greater than 1 indicate traffic delays.";

/// `actual / predicted`, or undefined when the divisor is zero or non-finite.
///
/// Serializes as a number, or as the string `"undefined"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Defined(f64),
    Undefined,
}

impl Ratio {
    pub fn of(actual: f64, predicted: f64) -> Self {
        if predicted == 0.0 || !predicted.is_finite() {
            return Ratio::Undefined;
        }
        let ratio = actual / predicted;
        if ratio.is_finite() {
            Ratio::Defined(ratio)
        } else {
            Ratio::Undefined
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(v),
            Ratio::Undefined => None,
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ratio::Defined(v) => serializer.serialize_f64(*v),
            Ratio::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

/// Outcome of one aggregation scope: either its statistics or why there are none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scoped<T> {
    Ready(T),
    Failed { error: String },
}

impl<T> Scoped<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Scoped::Ready(value) => Some(value),
            Scoped::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Scoped::Ready(_) => None,
            Scoped::Failed { error } => Some(error),
        }
    }
}

impl<T> From<Result<T, AggregationError>> for Scoped<T> {
    fn from(result: Result<T, AggregationError>) -> Self {
        match result {
            Ok(value) => Scoped::Ready(value),
            Err(e) => Scoped::Failed {
                error: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAccuracy {
    pub average_predicted_time_minutes: f64,
    pub difference_from_actual_minutes: f64,
    pub ratio_to_actual: Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageTimeSummary {
    pub actual_average_time_minutes: f64,
    #[serde(flatten)]
    pub models: PerModel<ModelAccuracy>,
    pub most_accurate_model: ModelKind,
    /// Records that contributed to the averages.
    pub sample_size: usize,
    /// Records inside the cap whose prediction failed.
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageTimeReport {
    pub model_based_predictions: Scoped<AverageTimeSummary>,
    pub total_records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficImpact {
    pub average_actual_minutes: f64,
    pub prediction_minutes: PerModel<f64>,
    pub impact_ratio: PerModel<Ratio>,
    pub sample_size: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelBasedTrafficImpact {
    pub overall: Scoped<TrafficImpact>,
    pub by_market: BTreeMap<i32, Scoped<TrafficImpact>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficImpactReport {
    pub model_based_traffic_impact: ModelBasedTrafficImpact,
    pub note: &'static str,
    /// Stored records with a positive estimated driving duration.
    pub total_records: usize,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

//! # Analytics Aggregator
//!
//! Replays stored deliveries through every model and summarizes how the
//! predictions compare with what actually happened.
//!
//! ## Scopes
//! A scope is either the overall record set or one market's subset. Each scope:
//! 1. Drops records that were never delivered.
//! 2. Takes the first `cap` remaining records in store order.
//! 3. Replays each one as a [`Replay::Sample`] or a [`Replay::Skip`].
//! 4. Divides the sums by the number of records considered, skipped ones included.
//!
//! A scope in which nothing contributed fails with
//! [`AggregationError::NoUsableRecords`]. That failure is reported inside the
//! scope and leaves every other scope intact.

pub mod report;

use std::collections::BTreeMap;
use std::sync::Arc;

use etacast_common::delivery::kind::{ModelKind, PerModel};
use etacast_common::delivery::record::DeliveryRecord;
use etacast_common::error::{AggregationError, PredictionError};
use etacast_common::store::RecordStore;
use etacast_common::{debug, warn};
use rayon::prelude::*;

use crate::registry::ModelRegistry;

pub use report::{
    AverageTimeReport, AverageTimeSummary, ModelAccuracy, ModelBasedTrafficImpact, Ratio, Scoped,
    TrafficImpact, TrafficImpactReport, TRAFFIC_NOTE,
};

pub const DEFAULT_OVERALL_LIMIT: usize = 1000;
pub const DEFAULT_MARKET_LIMIT: usize = 500;

/// How many delivered records a scope may replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsLimits {
    pub overall: usize,
    pub per_market: usize,
}

impl Default for AnalyticsLimits {
    fn default() -> Self {
        Self {
            overall: DEFAULT_OVERALL_LIMIT,
            per_market: DEFAULT_MARKET_LIMIT,
        }
    }
}

/// One record's contribution to a scope.
#[derive(Debug, Clone, PartialEq)]
pub enum Replay {
    Sample { actual: f64, predicted: PerModel<f64> },
    Skip(PredictionError),
}

impl Replay {
    pub fn of(registry: &ModelRegistry, record: &DeliveryRecord) -> Self {
        let sample = record.actual_minutes().and_then(|actual| {
            let predicted = registry.predict_all(record)?;
            Ok(Replay::Sample { actual, predicted })
        });
        sample.unwrap_or_else(Replay::Skip)
    }
}

/// Running sums over a scope.
#[derive(Debug, Clone, Default, PartialEq)]
struct ScopeTotals {
    actual: f64,
    predicted: PerModel<f64>,
    used: usize,
    skipped: usize,
}

impl ScopeTotals {
    fn absorb(mut self, replay: Replay) -> Self {
        match replay {
            Replay::Sample { actual, predicted } => {
                self.actual += actual;
                for kind in ModelKind::ALL {
                    *self.predicted.get_mut(kind) += *predicted.get(kind);
                }
                self.used += 1;
            }
            Replay::Skip(_) => self.skipped += 1,
        }
        self
    }

    fn considered(&self) -> f64 {
        (self.used + self.skipped) as f64
    }

    fn average_actual(&self) -> f64 {
        self.actual / self.considered()
    }

    fn average_predicted(&self) -> PerModel<f64> {
        let considered = self.considered();
        self.predicted.map(|_, sum| sum / considered)
    }
}

/// Groups records by market id, keeping store order within each market.
///
/// Records without a market id belong to no group.
pub fn group_by_market(records: &[DeliveryRecord]) -> BTreeMap<i32, Vec<&DeliveryRecord>> {
    let mut groups: BTreeMap<i32, Vec<&DeliveryRecord>> = BTreeMap::new();
    for record in records {
        if let Some(market) = record.market_id {
            groups.entry(market).or_default().push(record);
        }
    }
    groups
}

/// Picks the model with the smallest absolute error.
///
/// Only a strictly smaller error displaces the current pick, so ties keep the
/// earlier model.
pub fn most_accurate(differences: &PerModel<f64>) -> ModelKind {
    let mut best = ModelKind::Simple;
    for (kind, difference) in differences.iter() {
        if difference.abs() < differences.get(best).abs() {
            best = kind;
        }
    }
    best
}

pub struct AnalyticsAggregator {
    registry: Arc<ModelRegistry>,
    store: Arc<dyn RecordStore>,
    limits: AnalyticsLimits,
}

impl AnalyticsAggregator {
    pub fn new(registry: Arc<ModelRegistry>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            registry,
            store,
            limits: AnalyticsLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: AnalyticsLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn average_delivery_time_report(&self) -> Result<AverageTimeReport, AggregationError> {
        let records = self.store.find_all()?;
        Ok(self.average_time(&records))
    }

    pub fn traffic_impact_report(&self) -> Result<TrafficImpactReport, AggregationError> {
        let records = self.store.find_all()?;
        Ok(self.traffic_impact(&records))
    }

    /// Builds the average-time report over an already loaded record set.
    pub fn average_time(&self, records: &[DeliveryRecord]) -> AverageTimeReport {
        let summary = self
            .totals(records.iter(), self.limits.overall, "overall")
            .map(|totals| {
                let actual = totals.average_actual();
                let models = totals.average_predicted().map(|_, &predicted| ModelAccuracy {
                    average_predicted_time_minutes: predicted,
                    difference_from_actual_minutes: actual - predicted,
                    ratio_to_actual: Ratio::of(actual, predicted),
                });
                let differences = models.map(|_, m| m.difference_from_actual_minutes);

                AverageTimeSummary {
                    actual_average_time_minutes: actual,
                    most_accurate_model: most_accurate(&differences),
                    models,
                    sample_size: totals.used,
                    skipped: totals.skipped,
                }
            });

        AverageTimeReport {
            model_based_predictions: summary.into(),
            total_records: records.len(),
        }
    }

    /// Builds the traffic-impact report over an already loaded record set.
    ///
    /// Markets are evaluated in parallel.
    pub fn traffic_impact(&self, records: &[DeliveryRecord]) -> TrafficImpactReport {
        let overall = self.impact(records.iter(), self.limits.overall, "overall");

        let by_market = group_by_market(records)
            .par_iter()
            .map(|(market, group)| {
                let scope = format!("market {market}");
                let impact = self.impact(group.iter().copied(), self.limits.per_market, &scope);
                (*market, impact)
            })
            .collect();

        let total_records = records
            .iter()
            .filter(|r| r.estimated_driving_duration.is_some_and(|d| d > 0.0))
            .count();

        TrafficImpactReport {
            model_based_traffic_impact: ModelBasedTrafficImpact { overall, by_market },
            note: TRAFFIC_NOTE,
            total_records,
        }
    }

    fn impact<'r>(
        &self,
        records: impl Iterator<Item = &'r DeliveryRecord>,
        cap: usize,
        scope: &str,
    ) -> Scoped<TrafficImpact> {
        self.totals(records, cap, scope)
            .map(|totals| {
                let actual = totals.average_actual();
                let predicted = totals.average_predicted();
                TrafficImpact {
                    average_actual_minutes: actual,
                    impact_ratio: predicted.map(|_, &p| Ratio::of(actual, p)),
                    prediction_minutes: predicted,
                    sample_size: totals.used,
                    skipped: totals.skipped,
                }
            })
            .into()
    }

    fn totals<'r>(
        &self,
        records: impl Iterator<Item = &'r DeliveryRecord>,
        cap: usize,
        scope: &str,
    ) -> Result<ScopeTotals, AggregationError> {
        let totals = records
            .filter(|record| record.is_delivered())
            .take(cap)
            .map(|record| {
                let replay = Replay::of(&self.registry, record);
                if let Replay::Skip(reason) = &replay {
                    debug!("Skipping record {:?} in {scope}: {reason}", record.id);
                }
                replay
            })
            .fold(ScopeTotals::default(), ScopeTotals::absorb);

        if totals.used == 0 {
            warn!("No usable delivery records for {scope}");
            return Err(AggregationError::NoUsableRecords {
                scope: scope.to_string(),
            });
        }
        Ok(totals)
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

use etacast_common::delivery::kind::ModelKind;
use etacast_common::delivery::record::DeliveryRecord;
use etacast_common::error::{PredictionError, TrainingError};

use super::{DeliveryModel, finite, log_progress, qr};

/// Intercept plus one slope per feature.
const PARAMETERS: usize = 4;

const COLUMNS: [&str; PARAMETERS] = [
    "intercept",
    "totalItems",
    "subtotal",
    "estimatedDrivingDuration",
];

/// Ordinary least squares over item count, subtotal and driving duration:
///
/// ```text
/// minutes = b0 + b1 * totalItems + b2 * subtotal + b3 * drivingDuration
/// ```
///
/// Always refit from the full record set; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipleRegression {
    coefficients: [f64; PARAMETERS],
    observations: usize,
}

impl MultipleRegression {
    pub fn fit(records: &[DeliveryRecord]) -> Result<Self, TrainingError> {
        let mut rows: Vec<[f64; PARAMETERS]> = Vec::with_capacity(records.len());
        let mut targets: Vec<f64> = Vec::with_capacity(records.len());

        for record in records {
            let Ok(minutes) = record.actual_minutes() else {
                continue;
            };
            let Ok(row) = features(record) else {
                continue;
            };
            rows.push(row);
            targets.push(minutes);
            log_progress(ModelKind::Multiple, rows.len());
        }

        if rows.len() < PARAMETERS {
            return Err(TrainingError::InsufficientData {
                model: ModelKind::Multiple,
                required: PARAMETERS,
                actual: rows.len(),
            });
        }

        let coefficients =
            qr::least_squares(&rows, &targets).map_err(|column| TrainingError::RankDeficient {
                model: ModelKind::Multiple,
                column: COLUMNS[column.min(PARAMETERS - 1)],
            })?;

        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(TrainingError::Degenerate {
                model: ModelKind::Multiple,
                reason: "least squares produced non-finite coefficients".to_string(),
            });
        }

        Ok(Self {
            coefficients,
            observations: rows.len(),
        })
    }

    /// `[intercept, totalItems, subtotal, drivingDuration]`
    pub fn coefficients(&self) -> &[f64; PARAMETERS] {
        &self.coefficients
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    pub fn column_names() -> &'static [&'static str; PARAMETERS] {
        &COLUMNS
    }
}

impl DeliveryModel for MultipleRegression {
    fn kind(&self) -> ModelKind {
        ModelKind::Multiple
    }

    fn predict(&self, record: &DeliveryRecord) -> Result<f64, PredictionError> {
        let x = features(record)?;
        let estimate: f64 = x
            .iter()
            .zip(self.coefficients.iter())
            .map(|(x, b)| x * b)
            .sum();
        finite(ModelKind::Multiple, estimate)
    }
}

fn features(record: &DeliveryRecord) -> Result<[f64; PARAMETERS], PredictionError> {
    Ok([
        1.0,
        record.item_count()?,
        record.subtotal_amount()?,
        record.driving_duration()?,
    ])
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 2, 1)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap()
    }

    fn order(items: u32, subtotal: f64, duration: f64, minutes: i64) -> DeliveryRecord {
        DeliveryRecord::builder(start())
            .total_items(items)
            .subtotal(subtotal)
            .driving_duration(duration)
            .delivered_at(start() + Duration::minutes(minutes))
            .build()
            .unwrap()
    }

    /// minutes = 10 + 2 * items + 0.01 * subtotal + 1 * duration
    fn exact_orders() -> Vec<DeliveryRecord> {
        [
            (1, 1000.0, 10.0),
            (2, 3000.0, 15.0),
            (4, 2000.0, 12.0),
            (3, 5000.0, 30.0),
            (6, 4000.0, 20.0),
            (5, 7000.0, 18.0),
        ]
        .into_iter()
        .map(|(items, subtotal, duration)| {
            let minutes = 10.0 + 2.0 * items as f64 + 0.01 * subtotal + duration;
            order(items, subtotal, duration, minutes.round() as i64)
        })
        .collect()
    }

    #[test]
    fn recovers_generating_coefficients() {
        let model = MultipleRegression::fit(&exact_orders()).unwrap();
        let [b0, b1, b2, b3] = *model.coefficients();
        assert_abs_diff_eq!(b0, 10.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b1, 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b2, 0.01, epsilon = 1e-9);
        assert_abs_diff_eq!(b3, 1.0, epsilon = 1e-6);
        assert_eq!(model.observations(), 6);
    }

    #[test]
    fn prediction_is_dot_product() {
        let model = MultipleRegression::fit(&exact_orders()).unwrap();
        let query = DeliveryRecord::builder(start())
            .total_items(2)
            .subtotal(2500.0)
            .driving_duration(14.0)
            .build()
            .unwrap();
        assert_abs_diff_eq!(model.predict(&query).unwrap(), 53.0, epsilon = 1e-6);
    }

    #[test]
    fn refitting_is_deterministic() {
        let orders = exact_orders();
        let first = MultipleRegression::fit(&orders).unwrap();
        let second = MultipleRegression::fit(&orders).unwrap();
        assert_eq!(first.coefficients(), second.coefficients());
    }

    #[test]
    fn empty_record_set_is_a_training_error() {
        let result = MultipleRegression::fit(&[]);
        assert_eq!(
            result,
            Err(TrainingError::InsufficientData {
                model: ModelKind::Multiple,
                required: 4,
                actual: 0,
            })
        );
    }

    #[test]
    fn constant_predictor_is_rank_deficient() {
        let orders: Vec<DeliveryRecord> = (0..6)
            .map(|i| order(3, 1000.0 + 250.0 * i as f64, 10.0 + i as f64 * 2.0, 30 + i))
            .collect();
        let result = MultipleRegression::fit(&orders);
        assert_eq!(
            result,
            Err(TrainingError::RankDeficient {
                model: ModelKind::Multiple,
                column: "totalItems",
            })
        );
    }

    #[test]
    fn missing_feature_fails_prediction() {
        let model = MultipleRegression::fit(&exact_orders()).unwrap();
        let query = DeliveryRecord::builder(start())
            .total_items(2)
            .driving_duration(14.0)
            .build()
            .unwrap();
        assert_eq!(
            model.predict(&query),
            Err(PredictionError::MissingField("subtotal"))
        );
    }
}

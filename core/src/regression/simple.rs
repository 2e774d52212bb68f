//! Single-predictor ordinary least squares.
//!
//! Fits `minutes = intercept + slope * drivingDuration` over completed
//! deliveries using mean-centred sums, so the fitted line always passes
//! through the mean point of the training data.

use etacast_common::delivery::kind::ModelKind;
use etacast_common::delivery::record::DeliveryRecord;
use etacast_common::error::{PredictionError, TrainingError};

use super::{DeliveryModel, finite, log_progress};

const MIN_OBSERVATIONS: usize = 2;
const VARIANCE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleRegression {
    intercept: f64,
    slope: f64,
    observations: usize,
    mean_duration: f64,
    mean_minutes: f64,
    r_squared: f64,
}

impl SimpleRegression {
    /// Fits the model on every completed record that carries a driving duration.
    pub fn fit(records: &[DeliveryRecord]) -> Result<Self, TrainingError> {
        let pairs: Vec<(f64, f64)> = training_pairs(records);
        Self::fit_pairs(&pairs)
    }

    /// Fits the model on `(duration, minutes)` pairs.
    pub fn fit_pairs(pairs: &[(f64, f64)]) -> Result<Self, TrainingError> {
        if pairs.len() < MIN_OBSERVATIONS {
            return Err(TrainingError::InsufficientData {
                model: ModelKind::Simple,
                required: MIN_OBSERVATIONS,
                actual: pairs.len(),
            });
        }

        let n = pairs.len() as f64;
        let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

        let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
        for (x, y) in pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }

        if sxx <= VARIANCE_TOLERANCE * n {
            return Err(TrainingError::Degenerate {
                model: ModelKind::Simple,
                reason: "estimated driving duration has no variance".to_string(),
            });
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let r_squared = if syy > 0.0 {
            (sxy * sxy) / (sxx * syy)
        } else {
            1.0
        };

        Ok(Self {
            intercept,
            slope,
            observations: pairs.len(),
            mean_duration: mean_x,
            mean_minutes: mean_y,
            r_squared,
        })
    }

    /// Rebuilds a fitted model from persisted parameters.
    pub fn from_parts(
        intercept: f64,
        slope: f64,
        observations: usize,
        mean_duration: f64,
        mean_minutes: f64,
        r_squared: f64,
    ) -> Self {
        Self {
            intercept,
            slope,
            observations,
            mean_duration,
            mean_minutes,
            r_squared,
        }
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    pub fn mean_duration(&self) -> f64 {
        self.mean_duration
    }

    pub fn mean_minutes(&self) -> f64 {
        self.mean_minutes
    }

    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    pub fn predict_duration(&self, duration: f64) -> Result<f64, PredictionError> {
        if duration < 0.0 {
            return Err(PredictionError::NegativeDuration(duration));
        }
        finite(ModelKind::Simple, self.intercept + self.slope * duration)
    }
}

impl DeliveryModel for SimpleRegression {
    fn kind(&self) -> ModelKind {
        ModelKind::Simple
    }

    fn predict(&self, record: &DeliveryRecord) -> Result<f64, PredictionError> {
        self.predict_duration(record.driving_duration()?)
    }
}

fn training_pairs(records: &[DeliveryRecord]) -> Vec<(f64, f64)> {
    let mut pairs = Vec::with_capacity(records.len());
    for record in records {
        let (Ok(duration), Ok(minutes)) = (record.driving_duration(), record.actual_minutes())
        else {
            continue;
        };
        pairs.push((duration, minutes));
        log_progress(ModelKind::Simple, pairs.len());
    }
    pairs
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

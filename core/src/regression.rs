//! The common **abstraction** over the three delivery-time regressions.
//!
//! Every model turns a [`DeliveryRecord`] into predicted delivery minutes.
//! Fitting is model-specific and happens once, inside the
//! [`ModelRegistry`](crate::registry::ModelRegistry); afterwards a model is an
//! immutable function object that can be shared freely between threads.
//!
//! * [`simple`]: one predictor (estimated driving duration), fitted by OLS.
//! * [`multiple`]: item count, subtotal and driving duration, fitted by QR least squares.
//! * [`polynomial`]: a fixed quadratic in driving duration. Never fitted.

use etacast_common::delivery::kind::ModelKind;
use etacast_common::delivery::record::DeliveryRecord;
use etacast_common::error::PredictionError;

pub mod multiple;
pub mod polynomial;
pub mod simple;

mod qr;

pub use multiple::MultipleRegression;
pub use polynomial::PolynomialModel;
pub use simple::SimpleRegression;

/// How often training logs its progress, in records.
const PROGRESS_INTERVAL: usize = 100;

pub trait DeliveryModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Predicts delivery minutes for `record`.
    ///
    /// A non-finite estimate is an error, never a silent value.
    fn predict(&self, record: &DeliveryRecord) -> Result<f64, PredictionError>;
}

pub(crate) fn finite(model: ModelKind, estimate: f64) -> Result<f64, PredictionError> {
    if estimate.is_finite() {
        Ok(estimate)
    } else {
        Err(PredictionError::NonFinite { model })
    }
}

pub(crate) fn log_progress(model: ModelKind, seen: usize) {
    if seen % PROGRESS_INTERVAL == 0 {
        etacast_common::debug!("{model}: {seen} records trained");
    }
}

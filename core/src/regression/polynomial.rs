use etacast_common::delivery::kind::ModelKind;
use etacast_common::delivery::record::DeliveryRecord;
use etacast_common::error::PredictionError;

use super::{DeliveryModel, finite};

/// `0 + 0.5 * d + 1.5 * d^2`, lowest degree first.
pub const DEFAULT_COEFFICIENTS: [f64; 3] = [0.0, 0.5, 1.5];

/// A quadratic in estimated driving duration with fixed coefficients.
///
/// The coefficients are constants, not fitted from historical data, so this
/// model is available even when the record store is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialModel {
    coefficients: [f64; 3],
}

impl Default for PolynomialModel {
    fn default() -> Self {
        Self::new(DEFAULT_COEFFICIENTS)
    }
}

impl PolynomialModel {
    pub fn new(coefficients: [f64; 3]) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f64; 3] {
        &self.coefficients
    }

    pub fn value(&self, duration: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * duration + c)
    }
}

impl DeliveryModel for PolynomialModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Polynomial
    }

    fn predict(&self, record: &DeliveryRecord) -> Result<f64, PredictionError> {
        let duration = record.driving_duration()?;
        finite(ModelKind::Polynomial, self.value(duration))
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

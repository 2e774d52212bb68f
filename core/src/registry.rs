//! # Model Registry
//!
//! Owns the three delivery-time models and serves predictions through one
//! uniform contract.
//!
//! Construction is the only phase with side effects:
//! 1. Load every record from the store.
//! 2. Restore the simple model from its snapshot, or fit it and write a fresh snapshot.
//! 3. Fit the multiple model from the current records.
//! 4. Build the polynomial model from its fixed coefficients.
//!
//! A registry that exists is fully initialized. Afterwards it is read-only and
//! can be shared across threads without locking.

use std::path::Path;

use etacast_common::delivery::kind::{ModelKind, PerModel};
use etacast_common::delivery::record::DeliveryRecord;
use etacast_common::error::{PredictionError, RegistryError, SnapshotError, TrainingError};
use etacast_common::store::RecordStore;
use etacast_common::{info, success, warn};
use serde::Serialize;

use crate::regression::{DeliveryModel, MultipleRegression, PolynomialModel, SimpleRegression};
use crate::snapshot;

/// Where a model's parameters came from on this start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelOrigin {
    Snapshot,
    Trained,
    Constant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub kind: ModelKind,
    pub origin: ModelOrigin,
    pub parameters: Vec<(&'static str, f64)>,
    pub observations: Option<usize>,
    pub r_squared: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ModelRegistry {
    simple: SimpleRegression,
    multiple: MultipleRegression,
    polynomial: PolynomialModel,
    simple_origin: ModelOrigin,
}

impl ModelRegistry {
    /// Initializes every model from the store's current contents.
    ///
    /// `snapshot_path` of `None` disables persistence of the simple model.
    pub fn initialize(
        store: &dyn RecordStore,
        snapshot_path: Option<&Path>,
    ) -> Result<Self, RegistryError> {
        let records = store.find_all()?;
        info!("Loaded {} delivery records for training", records.len());
        Ok(Self::from_records(&records, snapshot_path)?)
    }

    pub fn from_records(
        records: &[DeliveryRecord],
        snapshot_path: Option<&Path>,
    ) -> Result<Self, TrainingError> {
        let (simple, simple_origin) = restore_or_fit_simple(records, snapshot_path)?;
        let multiple = MultipleRegression::fit(records)?;
        success!(
            "Trained multiple regression on {} deliveries",
            multiple.observations()
        );

        Ok(Self {
            simple,
            multiple,
            polynomial: PolynomialModel::default(),
            simple_origin,
        })
    }

    pub fn model(&self, kind: ModelKind) -> &dyn DeliveryModel {
        match kind {
            ModelKind::Simple => &self.simple,
            ModelKind::Multiple => &self.multiple,
            ModelKind::Polynomial => &self.polynomial,
        }
    }

    pub fn predict(
        &self,
        kind: ModelKind,
        record: &DeliveryRecord,
    ) -> Result<f64, PredictionError> {
        self.model(kind).predict(record)
    }

    /// Scores `record` with every model, failing on the first model that cannot.
    pub fn predict_all(&self, record: &DeliveryRecord) -> Result<PerModel<f64>, PredictionError> {
        Ok(PerModel {
            simple: self.simple.predict(record)?,
            multiple: self.multiple.predict(record)?,
            polynomial: self.polynomial.predict(record)?,
        })
    }

    pub fn simple(&self) -> &SimpleRegression {
        &self.simple
    }

    pub fn multiple(&self) -> &MultipleRegression {
        &self.multiple
    }

    pub fn polynomial(&self) -> &PolynomialModel {
        &self.polynomial
    }

    pub fn simple_origin(&self) -> ModelOrigin {
        self.simple_origin
    }

    pub fn describe(&self) -> PerModel<ModelSummary> {
        let simple = ModelSummary {
            kind: self.simple.kind(),
            origin: self.simple_origin,
            parameters: vec![
                ("intercept", self.simple.intercept()),
                ("slope", self.simple.slope()),
            ],
            observations: Some(self.simple.observations()),
            r_squared: Some(self.simple.r_squared()),
        };

        let multiple = ModelSummary {
            kind: self.multiple.kind(),
            origin: ModelOrigin::Trained,
            parameters: MultipleRegression::column_names()
                .iter()
                .copied()
                .zip(self.multiple.coefficients().iter().copied())
                .collect(),
            observations: Some(self.multiple.observations()),
            r_squared: None,
        };

        let [c0, c1, c2] = *self.polynomial.coefficients();
        let polynomial = ModelSummary {
            kind: self.polynomial.kind(),
            origin: ModelOrigin::Constant,
            parameters: vec![("c0", c0), ("c1", c1), ("c2", c2)],
            observations: None,
            r_squared: None,
        };

        PerModel {
            simple,
            multiple,
            polynomial,
        }
    }
}

fn restore_or_fit_simple(
    records: &[DeliveryRecord],
    snapshot_path: Option<&Path>,
) -> Result<(SimpleRegression, ModelOrigin), TrainingError> {
    let Some(path) = snapshot_path else {
        let model = SimpleRegression::fit(records)?;
        success!("Trained simple regression on {} deliveries", model.observations());
        return Ok((model, ModelOrigin::Trained));
    };

    match snapshot::load(path) {
        Ok(model) => {
            success!("Loaded pre-trained simple regression from {}", path.display());
            return Ok((model, ModelOrigin::Snapshot));
        }
        Err(SnapshotError::Missing(_)) => {
            info!("No pre-trained simple regression found, training a new model");
        }
        Err(e) => {
            warn!("Discarding simple regression snapshot: {e}");
        }
    }

    let model = SimpleRegression::fit(records)?;
    success!("Trained simple regression on {} deliveries", model.observations());

    if let Err(e) = snapshot::save(&model, path) {
        warn!("Could not write simple regression snapshot: {e}");
    }

    Ok((model, ModelOrigin::Trained))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

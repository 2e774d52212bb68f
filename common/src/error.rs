//! # Error Taxonomy
//!
//! Each stage of the prediction pipeline owns one error type:
//!
//! * [`TrainingError`]: data cannot support a fit. Fatal to registry start-up.
//! * [`SnapshotError`]: persisted model state is unusable. Recovered by refitting.
//! * [`PredictionError`]: one record cannot be scored. Recovered by skipping it.
//! * [`AggregationError`]: an analytics scope has nothing to average.
//! * [`StoreError`] and [`RecordError`]: persistence and record lifecycle failures.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::delivery::kind::ModelKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("record {id:?} was already delivered at {at}")]
    AlreadyDelivered { id: Option<u64>, at: NaiveDateTime },

    #[error("delivery time {delivered} is earlier than creation time {created}")]
    DeliveredBeforeCreated {
        created: NaiveDateTime,
        delivered: NaiveDateTime,
    },

    #[error("estimated driving duration must be non-negative, got {0}")]
    NegativeDrivingDuration(f64),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record store I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record on line {line} of {path}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid record on line {line} of {path}: {source}")]
    Invalid {
        path: PathBuf,
        line: usize,
        #[source]
        source: RecordError,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no record with id {0}")]
    NotFound(u64),

    #[error("record store lock was poisoned")]
    Poisoned,

    #[error(transparent)]
    Record(#[from] RecordError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainingError {
    #[error("{model} needs at least {required} completed deliveries to fit, got {actual}")]
    InsufficientData {
        model: ModelKind,
        required: usize,
        actual: usize,
    },

    #[error("{model} cannot be fit: {reason}")]
    Degenerate { model: ModelKind, reason: String },

    #[error("{model} design matrix is rank deficient at column '{column}'")]
    RankDeficient {
        model: ModelKind,
        column: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("no model snapshot at {0}")]
    Missing(PathBuf),

    #[error("model snapshot I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model snapshot at {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode model snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("model snapshot is incompatible: {0}")]
    Incompatible(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("record is missing '{0}'")]
    MissingField(&'static str),

    #[error("record has no actual delivery time")]
    Undelivered,

    #[error("estimated driving duration must be non-negative, got {0}")]
    NegativeDuration(f64),

    #[error("estimated driving duration is not finite: {0}")]
    NonFiniteDuration(f64),

    #[error("{model} produced a non-finite estimate")]
    NonFinite { model: ModelKind },

    #[error("{model} estimate of {minutes} minutes cannot be recorded")]
    Unrecordable { model: ModelKind, minutes: f64 },
}

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("no usable delivery records for {scope}")]
    NoUsableRecords { scope: String },

    #[error("failed to read delivery records: {0}")]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to load training records: {0}")]
    Store(#[from] StoreError),

    #[error("model training failed: {0}")]
    Training(#[from] TrainingError),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

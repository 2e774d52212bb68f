//! # Simple Model Snapshot
//!
//! Persists the fitted simple regression so a restart can skip refitting.
//!
//! The file is a small JSON document tagged with a format name and version.
//! Anything that does not carry the expected tag, carries an unknown version,
//! or holds non-finite parameters is rejected as [`SnapshotError::Incompatible`];
//! the registry then refits and overwrites it.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use etacast_common::error::SnapshotError;
use serde::{Deserialize, Serialize};

use crate::regression::SimpleRegression;

const FORMAT: &str = "etacast/simple-regression";
const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimpleSnapshot {
    format: String,
    version: u32,
    intercept: f64,
    slope: f64,
    observations: usize,
    mean_duration: f64,
    mean_minutes: f64,
    r_squared: f64,
}

impl From<&SimpleRegression> for SimpleSnapshot {
    fn from(model: &SimpleRegression) -> Self {
        Self {
            format: FORMAT.to_string(),
            version: VERSION,
            intercept: model.intercept(),
            slope: model.slope(),
            observations: model.observations(),
            mean_duration: model.mean_duration(),
            mean_minutes: model.mean_minutes(),
            r_squared: model.r_squared(),
        }
    }
}

impl SimpleSnapshot {
    fn into_model(self) -> Result<SimpleRegression, SnapshotError> {
        if self.format != FORMAT {
            return Err(SnapshotError::Incompatible(format!(
                "expected format '{FORMAT}', found '{}'",
                self.format
            )));
        }
        if self.version != VERSION {
            return Err(SnapshotError::Incompatible(format!(
                "unsupported version {} (expected {VERSION})",
                self.version
            )));
        }
        let parameters = [
            self.intercept,
            self.slope,
            self.mean_duration,
            self.mean_minutes,
            self.r_squared,
        ];
        if parameters.iter().any(|p| !p.is_finite()) {
            return Err(SnapshotError::Incompatible(
                "snapshot holds non-finite parameters".to_string(),
            ));
        }
        if self.observations < 2 {
            return Err(SnapshotError::Incompatible(format!(
                "snapshot was fitted on {} observations",
                self.observations
            )));
        }

        Ok(SimpleRegression::from_parts(
            self.intercept,
            self.slope,
            self.observations,
            self.mean_duration,
            self.mean_minutes,
            self.r_squared,
        ))
    }
}

pub fn load(path: &Path) -> Result<SimpleRegression, SnapshotError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SnapshotError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(SnapshotError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let snapshot: SimpleSnapshot =
        serde_json::from_str(&raw).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    snapshot.into_model()
}

/// Writes the snapshot, creating parent directories as needed.
pub fn save(model: &SimpleRegression, path: &Path) -> Result<(), SnapshotError> {
    let io_err = |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(&SimpleSnapshot::from(model))?;
    fs::write(path, json).map_err(io_err)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

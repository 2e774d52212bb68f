use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use etacast_common::delivery::record::DeliveryRecord;
use etacast_common::error::StoreError;
use etacast_common::store::RecordStore;

use super::upsert;

/// Stores records as JSON lines in a single file.
///
/// A missing file is an empty store. Every save rewrites the file through a
/// temporary sibling and a rename, so readers never observe a half-written store.
#[derive(Debug)]
pub struct JsonLinesRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Result<Vec<DeliveryRecord>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        raw.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                let record: DeliveryRecord =
                    serde_json::from_str(line).map_err(|source| StoreError::Malformed {
                        path: self.path.clone(),
                        line: idx + 1,
                        source,
                    })?;
                record.validate().map_err(|source| StoreError::Invalid {
                    path: self.path.clone(),
                    line: idx + 1,
                    source,
                })?;
                Ok(record)
            })
            .collect()
    }

    fn write(&self, records: &[DeliveryRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut out = String::new();
        for record in records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }

        let tmp = self.path.with_extension("jsonl.tmp");
        fs::write(&tmp, out).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl RecordStore for JsonLinesRecordStore {
    fn find_all(&self) -> Result<Vec<DeliveryRecord>, StoreError> {
        self.read()
    }

    fn save(&self, record: DeliveryRecord) -> Result<DeliveryRecord, StoreError> {
        record.validate()?;
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut records = self.read()?;
        let saved = upsert(&mut records, record);
        self.write(&records)?;
        Ok(saved)
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

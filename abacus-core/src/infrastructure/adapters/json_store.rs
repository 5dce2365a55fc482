// abacus-core/src/infrastructure/adapters/json_store.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::error::DomainError;
use crate::domain::ports::DatasetRepository;
use crate::domain::project::DatasetRecord;
use crate::infrastructure::fs::write_json;

/// One pretty-printed JSON file per record under `<target>/datasets/`.
pub struct JsonDatasetStore {
    root: PathBuf,
}

impl JsonDatasetStore {
    pub fn new(target_dir: &Path) -> Self {
        Self {
            root: target_dir.join("datasets"),
        }
    }

    fn record_path(&self, id: &str) -> Result<PathBuf, DomainError> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(DomainError::RecordNotFound(id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }
}

fn persistence(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Persistence(format!("{}: {}", context, err))
}

impl DatasetRepository for JsonDatasetStore {
    fn save(&self, record: &DatasetRecord) -> Result<(), DomainError> {
        let path = self.record_path(&record.id)?;
        write_json(&path, record).map_err(|e| persistence(&format!("cannot write {:?}", path), e))?;

        debug!(id = %record.id, status = %record.status, "Dataset record saved");
        Ok(())
    }

    fn get(&self, id: &str) -> Result<DatasetRecord, DomainError> {
        let path = self.record_path(id)?;
        if !path.exists() {
            return Err(DomainError::RecordNotFound(id.to_string()));
        }
        let content =
            fs::read_to_string(&path).map_err(|e| persistence(&format!("cannot read {:?}", path), e))?;
        serde_json::from_str(&content).map_err(|e| persistence(&format!("corrupt record {:?}", path), e))
    }

    fn list(&self) -> Result<Vec<DatasetRecord>, DomainError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&self.root).map_err(|e| persistence(&format!("cannot list {:?}", self.root), e))?;

        let mut records = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| persistence("cannot read directory entry", e))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|c| serde_json::from_str::<DatasetRecord>(&c).map_err(|e| e.to_string()));
            match parsed {
                Ok(record) => records.push(record),
                // A broken file must not hide the others.
                Err(e) => warn!(path = ?path, error = %e, "Skipping unreadable dataset record"),
            }
        }

        records.sort_by(|a, b| b.upload_date.cmp(&a.upload_date).then_with(|| b.id.cmp(&a.id)));
        Ok(records)
    }
}

use crate::domain::error::DomainError;
use crate::domain::project::DatasetRecord;

/// Storage for dataset records. Saving an existing id replaces the record.
pub trait DatasetRepository: Send + Sync {
    fn save(&self, record: &DatasetRecord) -> Result<(), DomainError>;

    fn get(&self, id: &str) -> Result<DatasetRecord, DomainError>;

    /// Every stored record, newest upload first.
    fn list(&self) -> Result<Vec<DatasetRecord>, DomainError>;
}

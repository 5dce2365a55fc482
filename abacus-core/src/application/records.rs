// abacus-core/src/application/records.rs

use crate::domain::error::DomainError;
use crate::domain::ports::DatasetRepository;
use crate::domain::project::DatasetRecord;

/// Every dataset record, newest upload first.
pub fn list_datasets(repository: &dyn DatasetRepository) -> Result<Vec<DatasetRecord>, DomainError> {
    repository.list()
}

pub fn get_dataset(repository: &dyn DatasetRepository, id: &str) -> Result<DatasetRecord, DomainError> {
    repository.get(id)
}

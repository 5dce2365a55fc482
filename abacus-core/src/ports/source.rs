// abacus-core/src/ports/source.rs

// What the pipeline needs to read a dataset, without knowing which engine
// does the reading.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::dataset::RawTable;
use crate::error::AbacusError;

#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Reads a CSV file with a header row. Every value comes back as text,
    /// empty fields as `None`, rows in file order.
    async fn load_csv(&self, path: &Path) -> Result<RawTable, AbacusError>;

    fn engine_name(&self) -> &str;
}

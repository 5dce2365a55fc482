// abacus-core/src/infrastructure/adapters/datafusion.rs

use async_trait::async_trait;
use datafusion::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument};

// Hexagonal Imports
use crate::domain::dataset::RawTable;
use crate::error::AbacusError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::DatasetSource;

use datafusion::arrow::array::{Array, StringArray};
use datafusion::arrow::compute::cast;
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;

pub struct DataFusionSource {
    ctx: Arc<SessionContext>,
}

impl DataFusionSource {
    pub fn new() -> Self {
        // One partition keeps the batches in file order.
        let config = SessionConfig::new().with_target_partitions(1);
        Self {
            ctx: Arc::new(SessionContext::new_with_config(config)),
        }
    }

    async fn read(&self, path: &Path) -> Result<RawTable, InfrastructureError> {
        let path_str = path.to_str().ok_or_else(|| InfrastructureError::Ingest {
            path: path.display().to_string(),
            reason: "path is not valid UTF-8".to_string(),
        })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        // 1. Header only: let DataFusion infer, keep the names.
        let inferred = self
            .ctx
            .read_csv(path_str, CsvReadOptions::new().file_extension(&extension))
            .await?;
        let columns: Vec<String> = inferred
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();

        // 2. Re-read with every column as Utf8 so no value is reinterpreted.
        let schema = Schema::new(
            columns
                .iter()
                .map(|name| Field::new(name, DataType::Utf8, true))
                .collect::<Vec<_>>(),
        );
        let batches = self
            .ctx
            .read_csv(
                path_str,
                CsvReadOptions::new()
                    .file_extension(&extension)
                    .schema(&schema),
            )
            .await?
            .collect()
            .await?;

        let mut rows = Vec::new();
        for batch in &batches {
            append_batch(path_str, batch, &mut rows)?;
        }

        Ok(RawTable { columns, rows })
    }
}

impl Default for DataFusionSource {
    fn default() -> Self {
        Self::new()
    }
}

fn append_batch(
    path: &str,
    batch: &RecordBatch,
    rows: &mut Vec<Vec<Option<String>>>,
) -> Result<(), InfrastructureError> {
    let mut columns = Vec::with_capacity(batch.num_columns());
    for array in batch.columns() {
        let utf8 = cast(array, &DataType::Utf8)
            .map_err(|e| InfrastructureError::from(datafusion::error::DataFusionError::from(e)))?;
        columns.push(utf8);
    }

    let strings: Vec<&StringArray> = columns
        .iter()
        .map(|a| {
            a.as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| InfrastructureError::Ingest {
                    path: path.to_string(),
                    reason: "column could not be read as text".to_string(),
                })
        })
        .collect::<Result<_, _>>()?;

    for row in 0..batch.num_rows() {
        rows.push(
            strings
                .iter()
                .map(|col| (!col.is_null(row)).then(|| col.value(row).to_string()))
                .collect(),
        );
    }
    Ok(())
}

#[async_trait]
impl DatasetSource for DataFusionSource {
    #[instrument(skip(self), fields(engine = "datafusion"))]
    async fn load_csv(&self, path: &Path) -> Result<RawTable, AbacusError> {
        let table = self.read(path).await?;
        debug!(
            rows = table.rows.len(),
            columns = table.columns.len(),
            "CSV loaded"
        );
        Ok(table)
    }

    fn engine_name(&self) -> &str {
        "datafusion"
    }
}

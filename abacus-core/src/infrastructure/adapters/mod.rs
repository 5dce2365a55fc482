pub mod datafusion;
pub mod duckdb;
pub mod json_store;

pub use self::datafusion::DataFusionSource;
pub use self::duckdb::DuckDBSource;
pub use json_store::JsonDatasetStore;

use crate::domain::project::Engine;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::DatasetSource;

/// Reader for the configured engine. DuckDB runs in memory: nothing is kept
/// between runs.
pub fn source_for(engine: Engine) -> Result<Box<dyn DatasetSource>, InfrastructureError> {
    Ok(match engine {
        Engine::DuckDB => Box::new(DuckDBSource::in_memory()?),
        Engine::DataFusion => Box::new(DataFusionSource::new()),
    })
}

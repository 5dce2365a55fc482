// abacus-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

// Imports Hexagonaux
use crate::domain::dataset::RawTable;
use crate::error::AbacusError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::DatasetSource;

pub struct DuckDBSource {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBSource {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, InfrastructureError> {
        Self::new(":memory:")
    }

    fn read(conn: &Mutex<Connection>, path: &Path) -> Result<RawTable, InfrastructureError> {
        let conn = conn
            .lock()
            .map_err(|_| InfrastructureError::Io(std::io::Error::other("DuckDB Mutex Poisoned")))?;

        let path_str = path.to_str().ok_or_else(|| InfrastructureError::Ingest {
            path: path.display().to_string(),
            reason: "path is not valid UTF-8".to_string(),
        })?;

        // Everything as VARCHAR: typing happens in the domain, and codes such
        // as ZIPs must keep their leading zeros.
        let select = format!(
            "SELECT * FROM read_csv_auto('{}', header = true, all_varchar = true)",
            path_str.replace('\'', "''")
        );

        let mut describe = conn.prepare(&format!("DESCRIBE {}", select))?;
        let columns = describe
            .query_map([], |row| row.get::<_, String>("column_name"))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(&select)?;
        let mut rows = stmt.query([])?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            let record = (0..columns.len())
                .map(|i| row.get::<_, Option<String>>(i))
                .collect::<Result<Vec<_>, _>>()?;
            values.push(record);
        }

        Ok(RawTable {
            columns,
            rows: values,
        })
    }
}

#[async_trait]
impl DatasetSource for DuckDBSource {
    #[instrument(skip(self), fields(engine = "duckdb"))]
    async fn load_csv(&self, path: &Path) -> Result<RawTable, AbacusError> {
        // Blocking query: run it on the blocking pool, not on an async worker.
        let conn = Arc::clone(&self.conn);
        let owned = path.to_path_buf();
        let table = tokio::task::spawn_blocking(move || Self::read(&conn, &owned))
            .await
            .map_err(|e| AbacusError::InternalError(format!("DuckDB read task aborted: {}", e)))??;
        debug!(
            rows = table.rows.len(),
            columns = table.columns.len(),
            "CSV loaded"
        );
        Ok(table)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_duckdb_reads_everything_as_text() -> Result<()> {
        let dir = tempdir()?;
        let csv = dir.path().join("claims.csv");
        fs::write(
            &csv,
            "claim_id,zip_code,claim_amount\nCLM00001,02134,120.5\nCLM00002,,99\n",
        )?;

        let source = DuckDBSource::in_memory()?;
        let table = source.load_csv(&csv).await?;

        assert_eq!(table.columns, vec!["claim_id", "zip_code", "claim_amount"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1].as_deref(), Some("02134"));
        assert_eq!(table.rows[0][2].as_deref(), Some("120.5"));
        assert_eq!(table.rows[1][1], None);
        assert_eq!(source.engine_name(), "duckdb");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_duckdb_concurrent_reads_share_connection() -> Result<()> {
        let dir = tempdir()?;
        let mut paths = Vec::new();
        for i in 0..4 {
            let csv = dir.path().join(format!("claims_{}.csv", i));
            fs::write(&csv, format!("claim_id,zip_code\nCLM{:05},02134\n", i))?;
            paths.push(csv);
        }

        let source = DuckDBSource::in_memory()?;
        let tables = futures::future::try_join_all(paths.iter().map(|p| source.load_csv(p))).await?;

        for (i, table) in tables.iter().enumerate() {
            assert_eq!(table.rows.len(), 1);
            assert_eq!(table.rows[0][0], Some(format!("CLM{:05}", i)));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_duckdb_missing_file_is_an_error() -> Result<()> {
        let source = DuckDBSource::in_memory()?;
        let result = source.load_csv(Path::new("/definitely/not/here.csv")).await;
        assert!(result.is_err());
        Ok(())
    }
}

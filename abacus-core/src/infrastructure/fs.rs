// abacus-core/src/infrastructure/fs.rs

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::infrastructure::error::InfrastructureError;

/// Writes `content` to `path` through a temporary file in the same directory
/// that is renamed into place. Readers see the old file or the new one,
/// never a truncated record.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Pretty JSON, parent directories created on demand.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), InfrastructureError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(value)?;
    atomic_write(path, json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_replaces_content() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("record.json");

        atomic_write(&file_path, "{\"status\":\"pending\"}")?;
        atomic_write(&file_path, "{\"status\":\"completed\"}")?;

        assert_eq!(fs::read_to_string(&file_path)?, "{\"status\":\"completed\"}");
        // no temp file left behind
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_write_json_creates_parents() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("results").join("run.annotated.json");

        write_json(&file_path, &vec![1, 2, 3])?;

        let back: Vec<i32> = serde_json::from_str(&fs::read_to_string(&file_path)?)?;
        assert_eq!(back, vec![1, 2, 3]);
        Ok(())
    }
}

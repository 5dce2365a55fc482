// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::dataset::DatasetRules;
use crate::domain::detection::{DetectionConfig, EncodingConfig};

/// SQL engine used to read the input files.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    DuckDB,
    DataFusion,
}

impl std::str::FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "duckdb" => Ok(Engine::DuckDB),
            "datafusion" => Ok(Engine::DataFusion),
            other => Err(format!(
                "unknown engine '{}', expected 'duckdb' or 'datafusion'",
                other
            )),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate, PartialEq)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,
    pub version: String,

    #[serde(default)]
    pub engine: Engine,

    #[serde(rename = "config-paths", default)]
    pub config_paths: Vec<String>,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    #[validate(nested)]
    #[serde(default)]
    pub dataset: DatasetRules,

    #[validate(nested)]
    #[serde(default)]
    pub encoding: EncodingConfig,

    #[validate(nested)]
    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Annotated rows embedded in a dataset record.
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sample_rows: default_sample_rows(),
        }
    }
}

fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string()]
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_sample_rows() -> usize {
    1000
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_project_uses_defaults() {
        let config: ProjectConfig = serde_yaml::from_str("name: claims\nversion: '1.0'\n").unwrap();

        assert_eq!(config.engine, Engine::DuckDB);
        assert_eq!(config.target_path, "target");
        assert_eq!(config.clean_targets, vec!["target"]);
        assert_eq!(config.dataset, DatasetRules::default());
        assert_eq!(config.detection.contamination, 0.05);
        assert_eq!(config.detection.seed, 42);
        assert_eq!(config.output.sample_rows, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_validation_rejects_bad_contamination() {
        let yaml = "name: claims\nversion: '1.0'\ndetection:\n  contamination: 0.9\n";
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_engine_parsing() {
        assert_eq!("DataFusion".parse::<Engine>().unwrap(), Engine::DataFusion);
        assert_eq!("duckdb".parse::<Engine>().unwrap(), Engine::DuckDB);
        assert!("sqlite".parse::<Engine>().is_err());

        let config: ProjectConfig =
            serde_yaml::from_str("name: claims\nversion: '1'\nengine: datafusion\n").unwrap();
        assert_eq!(config.engine, Engine::DataFusion);
    }
}

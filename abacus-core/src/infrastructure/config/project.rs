// abacus-core/src/infrastructure/config/project.rs

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::dataset::DatasetRules;
use crate::domain::detection::DetectionConfig;
use crate::domain::project::configuration::{Engine, ProjectConfig};
use crate::infrastructure::error::InfrastructureError;

const CANDIDATES: [&str; 2] = ["abacus_project.yaml", "abacus.yaml"];

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Main file
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    let mut config: ProjectConfig = load_fragment(&config_path)?;

    // 2. Satellites override whole sections
    if let Some(config_folder) = config.config_paths.first() {
        let config_dir = project_dir.join(config_folder);
        if config_dir.exists() {
            load_satellite_configs(&mut config, &config_dir)?;
        }
    }

    // 3. Environment wins over files
    apply_env_overrides(&mut config)?;

    config.validate()?;
    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "{:?} (checked: {:?})",
        root, CANDIDATES
    )))
}

/// Reads one typed YAML document.
fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| InfrastructureError::ConfigError(format!("{:?}: {}", path, e)))
}

fn load_satellite_configs(
    config: &mut ProjectConfig,
    config_dir: &Path,
) -> Result<(), InfrastructureError> {
    let dataset_path = config_dir.join("dataset.yml");
    if dataset_path.exists() {
        config.dataset = load_fragment::<DatasetRules>(&dataset_path)?;
        info!("  📋 Dataset rules loaded");
    }

    let detection_path = config_dir.join("detection.yml");
    if detection_path.exists() {
        config.detection = load_fragment::<DetectionConfig>(&detection_path)?;
        info!("  🌲 Detection settings loaded");
    }

    Ok(())
}

fn apply_env_overrides(config: &mut ProjectConfig) -> Result<(), InfrastructureError> {
    if let Ok(val) = std::env::var("ABACUS_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Ok(val) = std::env::var("ABACUS_ENGINE") {
        let engine: Engine = val.parse().map_err(InfrastructureError::ConfigError)?;
        info!(old = ?config.engine, new = ?engine, "Overriding engine via ENV");
        config.engine = engine;
    }
    Ok(())
}

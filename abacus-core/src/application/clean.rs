// abacus-core/src/application/clean.rs

use std::fs;
use std::path::{Component, Path};
use tracing::info;

use crate::error::AbacusError;
use crate::infrastructure::config::project::load_project_config;

/// Removes the configured clean targets (record store, annotated exports).
pub fn clean_project(project_dir: &Path) -> Result<Vec<String>, AbacusError> {
    info!("🧹 Initializing Abacus cleanup sequence...");

    let config = load_project_config(project_dir)?;

    let targets = if config.clean_targets.is_empty() {
        vec!["target".to_string()]
    } else {
        config.clean_targets
    };

    let mut removed = Vec::new();
    for target_rel_path in targets {
        // Path traversal guard: relative, no `..`, inside the project
        let rel = Path::new(&target_rel_path);
        let escapes = rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_) | Component::RootDir));
        let full_path = project_dir.join(rel);
        if escapes || !full_path.starts_with(project_dir) {
            return Err(AbacusError::UnsafePath(target_rel_path));
        }

        if full_path.exists() {
            if full_path.is_dir() {
                fs::remove_dir_all(&full_path)?;
            } else {
                fs::remove_file(&full_path)?;
            }
            println!("   🗑️  Artifact removed: {}", target_rel_path);
            removed.push(target_rel_path);
        }
    }

    Ok(removed)
}

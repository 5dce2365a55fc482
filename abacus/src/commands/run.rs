// abacus/src/commands/run.rs
//
// USE CASE: Analyse claim files.

use std::path::PathBuf;

use abacus_core::application::run_pipeline;
use abacus_core::domain::project::Engine;
use abacus_core::infrastructure::adapters::{JsonDatasetStore, source_for};
use abacus_core::infrastructure::config::project::load_project_config;
use anyhow::Context;

pub async fn execute(project_dir: PathBuf, files: Vec<PathBuf>) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (v{})", config.name, config.version);

    // B. Adapters
    match config.engine {
        Engine::DuckDB => println!("   Engine: DuckDB 🦆"),
        Engine::DataFusion => println!("   Engine: Apache DataFusion 🏹"),
    }
    let source = source_for(config.engine).context("Failed to initialize the SQL engine")?;
    let repository = JsonDatasetStore::new(&project_dir.join(&config.target_path));
    tracing::debug!(files = files.len(), engine = source.engine_name(), "Run requested");

    // C. Run the Pipeline (Application Layer)
    let result = run_pipeline(
        &project_dir,
        &config,
        source.as_ref(),
        &repository,
        &files,
    )
    .await;

    match result {
        Ok(run_res) => {
            if run_res.success {
                println!("\n✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
            } else {
                eprintln!("\n❌ FAILURE. {} datasets failed.", run_res.errors.len());
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("\n💥 CRITICAL PIPELINE ERROR: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

// abacus/src/commands/show.rs
//
// USE CASE: Full record of one dataset (reports, stats, sample rows).

use std::path::PathBuf;

use abacus_core::application::get_dataset;
use abacus_core::infrastructure::adapters::JsonDatasetStore;
use abacus_core::infrastructure::config::project::load_project_config;

pub fn execute(project_dir: PathBuf, id: String) -> anyhow::Result<()> {
    let config = load_project_config(&project_dir)?;
    let repository = JsonDatasetStore::new(&project_dir.join(&config.target_path));

    match get_dataset(&repository, &id) {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

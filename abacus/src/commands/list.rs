// abacus/src/commands/list.rs
//
// USE CASE: Overview of processed datasets.

use std::path::PathBuf;

use abacus_core::application::list_datasets;
use abacus_core::infrastructure::adapters::JsonDatasetStore;
use abacus_core::infrastructure::config::project::load_project_config;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = load_project_config(&project_dir)?;
    let repository = JsonDatasetStore::new(&project_dir.join(&config.target_path));

    let records = list_datasets(&repository)?;
    if records.is_empty() {
        println!("📭 No dataset processed yet. Try 'abacus run <FILE>'.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "ID", "File", "Uploaded", "Status", "Score", "Rows", "Anomalies",
    ]);

    for record in &records {
        table.add_row(vec![
            record.id.clone(),
            record.filename.clone(),
            record.upload_date.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.status.to_string(),
            record
                .quality_score
                .map_or_else(|| "-".to_string(), |s| format!("{:.2}", s)),
            record
                .total_rows
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
            record
                .anomalies_found
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
        ]);
    }

    println!("{table}");
    println!("📊 {} datasets", records.len());
    Ok(())
}

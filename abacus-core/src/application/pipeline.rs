// abacus-core/src/application/pipeline.rs

use chrono::Utc;
use futures::StreamExt; // Extension trait for streams
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::error::AbacusError;
use crate::ports::source::DatasetSource;

// Application Services
use crate::application::analysis::{AnalysisOutcome, analyze};

// Domain
use crate::domain::dataset::Dataset;
use crate::domain::ports::DatasetRepository;
use crate::domain::project::{DatasetRecord, ProjectConfig, RunResults};

// Infrastructure
use crate::infrastructure::fs::write_json;

/// Files analysed at the same time.
const MAX_CONCURRENT_RUNS: usize = 4;

#[derive(Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub success: bool,
    pub datasets_processed: usize,
    pub dataset_ids: Vec<String>,
    pub errors: Vec<String>,
}

/// Processes every input file: one dataset record per file, moved through
/// `pending` → `processing` → `completed` | `failed`. A failing file never
/// stops the others.
#[instrument(skip_all, fields(inputs = inputs.len(), engine = source.engine_name()))]
pub async fn run_pipeline(
    project_dir: &Path,
    config: &ProjectConfig,
    source: &dyn DatasetSource,
    repository: &dyn DatasetRepository,
    inputs: &[PathBuf],
) -> Result<RunResult, AbacusError> {
    println!("🚀 Starting Pipeline Orchestrator...");
    let start_time = std::time::Instant::now();

    // 1. SETUP
    let target_dir = project_dir.join(&config.target_path);
    if !target_dir.exists() {
        fs::create_dir_all(&target_dir)?;
    }

    // 2. REGISTRATION: every file gets a pending record up front
    let mut records = Vec::with_capacity(inputs.len());
    let mut seen = HashSet::new();
    for path in inputs {
        let mut record = DatasetRecord::pending(path, Utc::now());
        record.id = unique_id(&mut seen, record.id);
        if let Err(e) = repository.save(&record) {
            abort_registration(repository, &mut records, &e.to_string());
            return Err(e.into());
        }
        println!("  📥 Registered {} as {}", record.filename, record.id);
        records.push((path.clone(), record));
    }

    // 3. EXECUTION (bounded concurrency, one isolated run per file)
    let shared_config = Arc::new(config.clone());
    let target_dir = target_dir.as_path();
    let runs = records.into_iter().map(|(path, record)| {
        let config = shared_config.clone();
        async move { process_dataset(&path, record, config, source, repository, target_dir).await }
    });
    let finished: Vec<DatasetRecord> = futures::stream::iter(runs)
        .buffer_unordered(MAX_CONCURRENT_RUNS)
        .collect()
        .await;

    // 4. REPORT
    let mut dataset_ids = Vec::with_capacity(finished.len());
    let mut errors = Vec::new();
    for record in &finished {
        dataset_ids.push(record.id.clone());
        match &record.error {
            None => println!(
                "    ✅ {}: score {:.2}, {} anomalies",
                record.filename,
                record.quality_score.unwrap_or_default(),
                record.anomalies_found.unwrap_or_default()
            ),
            Some(e) => {
                eprintln!("    ❌ {}: {}", record.filename, e);
                errors.push(format!("{}: {}", record.filename, e));
            }
        }
    }

    println!(
        "✨ Done in {:.2}s. Processed {} datasets.",
        start_time.elapsed().as_secs_f64(),
        finished.len()
    );

    let result = RunResult {
        success: errors.is_empty(),
        datasets_processed: finished.len(),
        dataset_ids,
        errors,
    };
    write_json(&target_dir.join("run_results.json"), &result)?;

    Ok(result)
}

/// `id`, or `id-N` with the first free N.
fn unique_id(seen: &mut HashSet<String>, id: String) -> String {
    if seen.insert(id.clone()) {
        return id;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", id, n);
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Registration broke off: records already saved as pending must not stay
/// pending.
fn abort_registration(
    repository: &dyn DatasetRepository,
    records: &mut [(PathBuf, DatasetRecord)],
    cause: &str,
) {
    for (_, record) in records.iter_mut() {
        record.fail(format!("run aborted during registration: {}", cause));
        if let Err(e) = repository.save(record) {
            error!(id = %record.id, error = %e, "Cannot mark dataset as failed");
        }
    }
}

/// Runs one file to a terminal state. Errors end up in the record, which is
/// returned either way.
async fn process_dataset(
    path: &Path,
    mut record: DatasetRecord,
    config: Arc<ProjectConfig>,
    source: &dyn DatasetSource,
    repository: &dyn DatasetRepository,
    target_dir: &Path,
) -> DatasetRecord {
    record.start();
    if let Err(e) = repository.save(&record) {
        error!(id = %record.id, error = %e, "Cannot mark dataset as processing");
    }

    match analyze_file(path, config.clone(), source).await {
        Ok(outcome) => {
            let annotated_path = target_dir
                .join("results")
                .join(format!("{}.annotated.json", record.id));
            if let Err(e) = write_json(&annotated_path, &outcome.annotated.to_records(None)) {
                record.fail(format!("cannot write annotated dataset: {}", e));
            } else {
                record.complete(RunResults {
                    sample_data: outcome
                        .annotated
                        .to_records(Some(config.output.sample_rows)),
                    quality_report: outcome.quality_report,
                    anomaly_stats: outcome.anomaly_stats,
                });
                info!(id = %record.id, "Dataset completed");
            }
        }
        Err(e) => {
            error!(id = %record.id, error = %e, "Dataset failed");
            record.fail(e.to_string());
        }
    }

    if let Err(e) = repository.save(&record) {
        error!(id = %record.id, error = %e, "Cannot persist final dataset record");
        if record.error.is_none() {
            record.fail(e.to_string());
        }
    }
    record
}

async fn analyze_file(
    path: &Path,
    config: Arc<ProjectConfig>,
    source: &dyn DatasetSource,
) -> Result<AnalysisOutcome, AbacusError> {
    let raw = source.load_csv(path).await?;
    let dataset = Dataset::from_raw(raw, &config.dataset)?;

    // CPU-bound: keep it off the async workers.
    tokio::task::spawn_blocking(move || analyze(dataset, &config))
        .await
        .map_err(|e| AbacusError::InternalError(format!("analysis task aborted: {}", e)))?
        .map_err(AbacusError::Domain)
}

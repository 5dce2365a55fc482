// abacus-core/src/application/mod.rs

pub mod analysis;
pub mod clean;
pub mod pipeline;
pub mod records;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use abacus_core::application::{run_pipeline, clean_project, list_datasets};`

pub use analysis::{AnalysisOutcome, AnnotatedDataset, analyze};
pub use clean::clean_project;
pub use pipeline::{RunResult, run_pipeline};
pub use records::{get_dataset, list_datasets};

// abacus-core/src/domain/project/mod.rs

pub mod configuration;
pub mod record;

pub use configuration::{Engine, OutputConfig, ProjectConfig};
pub use record::{DatasetRecord, DatasetStatus, RunResults, SampleRow};

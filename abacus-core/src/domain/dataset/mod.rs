// abacus-core/src/domain/dataset/mod.rs

pub mod rules;
pub mod table;

pub use rules::DatasetRules;
pub use table::{Cell, Column, ColumnKind, Dataset, RawTable};

/// Columns added by the pipeline to the annotated export. They are stripped
/// on ingest so that a re-uploaded export is analysed like the raw file.
pub const DERIVED_COLUMNS: [&str; 5] = [
    "anomaly_reasons",
    "is_rule_anomaly",
    "is_ml_anomaly",
    "is_anomaly",
    "ml_anomaly_score",
];

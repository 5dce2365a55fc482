// src/domain/project/record.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::domain::detection::AnomalyStats;
use crate::domain::quality::QualityReport;

/// Lifecycle of one processed file.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatasetStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DatasetStatus::Pending => "pending",
            DatasetStatus::Processing => "processing",
            DatasetStatus::Completed => "completed",
            DatasetStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// One annotated row: column name to JSON value, in dataset column order.
pub type SampleRow = Map<String, Value>;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RunResults {
    pub quality_report: QualityReport,
    pub anomaly_stats: AnomalyStats,
    pub sample_data: Vec<SampleRow>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DatasetRecord {
    pub id: String,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub status: DatasetStatus,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub total_rows: Option<usize>,
    #[serde(default)]
    pub anomalies_found: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<RunResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatasetRecord {
    /// New `pending` record; the id is `<epoch millis>-<file stem>`.
    pub fn pending(path: &Path, now: DateTime<Utc>) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        let stem: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();

        Self {
            id: format!("{}-{}", now.timestamp_millis(), stem),
            filename,
            upload_date: now,
            status: DatasetStatus::Pending,
            quality_score: None,
            total_rows: None,
            anomalies_found: None,
            results: None,
            error: None,
        }
    }

    pub fn start(&mut self) {
        self.status = DatasetStatus::Processing;
    }

    pub fn complete(&mut self, results: RunResults) {
        self.status = DatasetStatus::Completed;
        self.quality_score = Some(results.quality_report.score);
        self.total_rows = Some(results.quality_report.initial_rows);
        self.anomalies_found = Some(results.anomaly_stats.total_anomalies);
        self.results = Some(results);
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = DatasetStatus::Failed;
        self.error = Some(message.into());
    }
}

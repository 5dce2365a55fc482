// abacus-core/src/domain/detection/model.rs

use tracing::{info, instrument};

use crate::domain::detection::config::DetectionConfig;
use crate::domain::detection::encoder::EncodedMatrix;
use crate::domain::detection::isolation::{IsolationForest, IsolationForestParams};
use crate::domain::error::DomainError;

/// Per-record output of the statistical stage.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierScores {
    pub outliers: Vec<bool>,
    /// Raw isolation scores, kept for diagnostics.
    pub scores: Vec<f64>,
    pub threshold: f64,
}

impl OutlierScores {
    pub fn len(&self) -> usize {
        self.outliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outliers.is_empty()
    }

    pub fn outlier_count(&self) -> usize {
        self.outliers.iter().filter(|o| **o).count()
    }
}

/// Fits a fresh isolation forest on one encoded dataset and labels every
/// row. A detector is cheap; build one per run instead of sharing a fitted
/// forest between datasets.
pub struct OutlierDetector {
    config: DetectionConfig,
}

impl OutlierDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    #[instrument(skip_all, fields(rows = matrix.n_rows(), features = matrix.n_features()))]
    pub fn fit_predict(&self, matrix: &EncodedMatrix) -> Result<OutlierScores, DomainError> {
        let rows = matrix.n_rows();
        let required = self.config.min_rows.max(2);
        if rows < required {
            return Err(DomainError::InsufficientData { rows, required });
        }
        if !(self.config.contamination > 0.0 && self.config.contamination <= 0.5) {
            return Err(DomainError::InvalidInput(format!(
                "contamination must be in (0, 0.5], got {}",
                self.config.contamination
            )));
        }

        let params = IsolationForestParams {
            n_estimators: self.config.n_estimators,
            max_samples: self.config.max_samples,
            seed: self.config.seed,
        };
        let forest = IsolationForest::fit(matrix.rows(), &params);
        let scores = forest.score_all(matrix.rows());

        // Rows scoring strictly above the (1 - contamination) percentile.
        let threshold = percentile(&scores, 1.0 - self.config.contamination);
        let outliers: Vec<bool> = scores.iter().map(|s| *s > threshold).collect();

        let result = OutlierScores {
            outliers,
            scores,
            threshold,
        };
        info!(
            outliers = result.outlier_count(),
            threshold, "Isolation forest labelled the dataset"
        );
        Ok(result)
    }
}

/// Linear-interpolated quantile, `q` in [0, 1].
fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

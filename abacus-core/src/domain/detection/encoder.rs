// abacus-core/src/domain/detection/encoder.rs

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use crate::domain::dataset::{Cell, Column, ColumnKind, DERIVED_COLUMNS};
use crate::domain::detection::config::{EncodingConfig, ZeroVariancePolicy};
use crate::domain::error::DomainError;
use crate::domain::quality::ImputedDataset;

/// Below this standard deviation a feature is treated as constant.
const MIN_STDDEV: f64 = 1e-9;

/// How a dataset column was turned into a feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureEncoding {
    /// Distinct values, sorted, mapped to 0..k. Only valid for this run.
    Categorical { codes: BTreeMap<String, usize> },
    Numeric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedFeature {
    pub column: String,
    pub encoding: FeatureEncoding,
    pub mean: f64,
    pub std: f64,
    /// Zero-variance column replaced by zeros.
    pub substituted: bool,
}

/// Standardized model input: one row per record (same order), one feature
/// per retained column (dataset column order).
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMatrix {
    features: Vec<EncodedFeature>,
    values: Vec<Vec<f64>>,
}

impl EncodedMatrix {
    pub fn from_rows(features: Vec<EncodedFeature>, values: Vec<Vec<f64>>) -> Result<Self, DomainError> {
        if values.iter().any(|row| row.len() != features.len()) {
            return Err(DomainError::InvalidInput(format!(
                "every encoded row must have {} features",
                features.len()
            )));
        }
        Ok(Self { features, values })
    }

    pub fn n_rows(&self) -> usize {
        self.values.len()
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    pub fn features(&self) -> &[EncodedFeature] {
        &self.features
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.column.as_str()).collect()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }
}

/// Per-run encoding state. A fresh context is built for every dataset so
/// that category codes never leak from one run into another.
pub struct EncodingContext {
    config: EncodingConfig,
}

impl EncodingContext {
    pub fn new(config: &EncodingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn is_excluded(&self, name: &str) -> bool {
        DERIVED_COLUMNS.contains(&name) || self.config.exclude_columns.iter().any(|c| c == name)
    }

    #[instrument(skip_all, fields(rows = dataset.row_count()))]
    pub fn fit_transform(&self, dataset: &ImputedDataset) -> Result<EncodedMatrix, DomainError> {
        let retained: Vec<&Column> = dataset
            .columns()
            .iter()
            .filter(|c| !self.is_excluded(c.name()))
            .collect();

        if retained.is_empty() {
            return Err(DomainError::InvalidInput(
                "no column left to encode".to_string(),
            ));
        }

        let n_rows = dataset.row_count();
        let mut features = Vec::with_capacity(retained.len());
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(retained.len());

        for column in retained {
            let (encoding, raw) = match column.kind() {
                ColumnKind::Text => encode_categorical(column),
                ColumnKind::Numeric => (FeatureEncoding::Numeric, numeric_values(column)?),
            };
            let (feature, standardized) = self.standardize(column.name(), encoding, raw)?;
            features.push(feature);
            columns.push(standardized);
        }

        let values: Vec<Vec<f64>> = (0..n_rows)
            .map(|row| columns.iter().map(|col| col[row]).collect())
            .collect();

        debug!(features = features.len(), "Feature matrix encoded");
        EncodedMatrix::from_rows(features, values)
    }

    fn standardize(
        &self,
        name: &str,
        encoding: FeatureEncoding,
        raw: Vec<f64>,
    ) -> Result<(EncodedFeature, Vec<f64>), DomainError> {
        let n = raw.len() as f64;
        let mean = raw.iter().sum::<f64>() / n;
        let variance = raw.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        if !mean.is_finite() || !std.is_finite() {
            return Err(DomainError::DegenerateColumn {
                column: name.to_string(),
                reason: "mean or standard deviation is not finite".to_string(),
            });
        }

        let substituted = std < MIN_STDDEV;
        let values = if substituted {
            match self.config.zero_variance {
                ZeroVariancePolicy::Fail => {
                    return Err(DomainError::DegenerateColumn {
                        column: name.to_string(),
                        reason: "zero variance".to_string(),
                    });
                }
                ZeroVariancePolicy::Substitute => {
                    warn!(column = name, "Zero-variance column encoded as zeros");
                    vec![0.0; raw.len()]
                }
            }
        } else {
            raw.iter().map(|v| (v - mean) / std).collect()
        };

        if values.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::DegenerateColumn {
                column: name.to_string(),
                reason: "standardization produced a non-finite value".to_string(),
            });
        }

        Ok((
            EncodedFeature {
                column: name.to_string(),
                encoding,
                mean,
                std,
                substituted,
            },
            values,
        ))
    }
}

fn encode_categorical(column: &Column) -> (FeatureEncoding, Vec<f64>) {
    let rendered: Vec<String> = column.cells().iter().map(Cell::render).collect();

    let mut codes: BTreeMap<String, usize> = rendered.iter().map(|v| (v.clone(), 0)).collect();
    for (code, slot) in codes.values_mut().enumerate() {
        *slot = code;
    }

    let values = rendered
        .iter()
        .map(|v| codes.get(v).copied().unwrap_or_default() as f64)
        .collect();
    (FeatureEncoding::Categorical { codes }, values)
}

fn numeric_values(column: &Column) -> Result<Vec<f64>, DomainError> {
    column
        .cells()
        .iter()
        .map(|cell| {
            cell.as_number().ok_or_else(|| {
                DomainError::InvalidInput(format!(
                    "column '{}' holds a non-numeric value after imputation",
                    column.name()
                ))
            })
        })
        .collect()
}

// abacus-core/src/domain/quality/scorer.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::quality::violation::{ValidationFlags, Violation};

/// Process-wide data quality summary, computed once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub initial_rows: usize,
    /// Always equal to `initial_rows`: rows are flagged, never dropped.
    pub final_rows: usize,
    pub missing_values: BTreeMap<String, usize>,
    pub duplicates: usize,
    pub format_errors: usize,
    /// Diagnostic only, does not affect the score.
    pub total_instances: usize,
    pub score: f64,
}

pub struct QualityScorer;

/// Highest score a dataset with at least one flagged row can get.
const MAX_FLAGGED_SCORE: f64 = 99.99;

impl QualityScorer {
    /// score = max(0, 100 - flagged_rows / total_rows * 100), 2 decimals.
    ///
    /// A row with several defects counts once. Rounding never lifts a
    /// flagged dataset to 100.
    pub fn score(dataset: &Dataset, flags: &[ValidationFlags]) -> Result<QualityReport, DomainError> {
        let total_rows = dataset.row_count();
        if total_rows == 0 {
            return Err(DomainError::InvalidInput(
                "cannot score an empty dataset".to_string(),
            ));
        }
        if flags.len() != total_rows {
            return Err(DomainError::InvalidInput(format!(
                "{} validation flags for {} rows",
                flags.len(),
                total_rows
            )));
        }

        let missing_values: BTreeMap<String, usize> = dataset
            .columns()
            .iter()
            .map(|column| {
                let missing = column.cells().iter().filter(|c| c.is_missing()).count();
                (column.name().to_string(), missing)
            })
            .collect();

        let duplicates = flags
            .iter()
            .filter(|f| f.contains(&Violation::DuplicateKey))
            .count();

        let format_errors = flags
            .iter()
            .flat_map(ValidationFlags::reasons)
            .filter(|v| v.is_format_error())
            .count();

        let flagged_rows = flags.iter().filter(|f| f.is_anomalous()).count();
        let mut score = round2((100.0 - flagged_rows as f64 / total_rows as f64 * 100.0).max(0.0));
        // 100.00 is reserved for a dataset with no flagged row
        if flagged_rows > 0 {
            score = score.min(MAX_FLAGGED_SCORE);
        }

        let total_instances = duplicates + missing_values.values().sum::<usize>() + format_errors;

        info!(
            rows = total_rows,
            flagged = flagged_rows,
            score,
            "Quality score computed"
        );

        Ok(QualityReport {
            initial_rows: total_rows,
            final_rows: total_rows,
            missing_values,
            duplicates,
            format_errors,
            total_instances,
            score,
        })
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::{Column, DatasetRules};
    use crate::domain::quality::validator::SchemaValidator;
    use crate::domain::test_support::{clean_dataset, scenario_dataset};

    fn validate(dataset: &Dataset) -> Vec<ValidationFlags> {
        SchemaValidator::new(&DatasetRules::default())
            .unwrap()
            .validate(dataset)
            .unwrap()
    }

    #[test]
    fn test_scenario_scores_sixty() {
        let dataset = scenario_dataset();
        let report = QualityScorer::score(&dataset, &validate(&dataset)).unwrap();

        assert_eq!(report.score, 60.0);
        assert_eq!(report.initial_rows, 10);
        assert_eq!(report.final_rows, 10);
        assert_eq!(report.duplicates, 2);
        assert_eq!(report.format_errors, 1);
        assert_eq!(report.missing_values["patient_name"], 1);
        assert_eq!(report.missing_values["zip_code"], 0);
        assert_eq!(report.total_instances, 4);
    }

    #[test]
    fn test_clean_dataset_scores_hundred() {
        let dataset = clean_dataset();
        let report = QualityScorer::score(&dataset, &validate(&dataset)).unwrap();
        assert_eq!(report.score, 100.0);
        assert_eq!(report.total_instances, 0);
    }

    #[test]
    fn test_row_with_many_defects_counts_once() {
        let dataset = Dataset::new(vec![
            Column::text("claim_id", [Some("A"), Some("A"), Some("B"), Some("C")]),
            Column::text("patient_name", [None, Some("p"), Some("q"), Some("r")]),
            Column::text("dob", [Some("bad"), Some("2020-01-01"), Some("2020-01-01"), Some("2020-01-01")]),
            Column::text("zip_code", [Some("1"), Some("12345"), Some("12345"), Some("12345")]),
            Column::numeric("claim_amount", [Some(1.0), Some(2.0), Some(3.0), None]),
        ])
        .unwrap();
        let report = QualityScorer::score(&dataset, &validate(&dataset)).unwrap();

        // rows 0 and 1 are flagged, row 0 carries four defects
        assert_eq!(report.score, 50.0);
        assert_eq!(report.duplicates, 2);
        assert_eq!(report.format_errors, 2);
        // 2 duplicates + 1 missing name + 1 missing amount + 2 format errors
        assert_eq!(report.total_instances, 6);
    }

    #[test]
    fn test_score_bounds_and_rounding() {
        let dataset = Dataset::new(vec![Column::text("claim_id", [Some("A"), Some("B"), Some("C")])]).unwrap();

        let mut one = ValidationFlags::new();
        one.push(Violation::DuplicateKey);
        let flags = vec![one, ValidationFlags::new(), ValidationFlags::new()];
        let report = QualityScorer::score(&dataset, &flags).unwrap();
        assert_eq!(report.score, 66.67);

        let all: Vec<ValidationFlags> = (0..3)
            .map(|_| {
                let mut f = ValidationFlags::new();
                f.push(Violation::InvalidDate);
                f
            })
            .collect();
        let report = QualityScorer::score(&dataset, &all).unwrap();
        assert_eq!(report.score, 0.0);
        assert!((0.0..=100.0).contains(&report.score));
    }

    #[test]
    fn test_single_flag_in_large_dataset_is_not_perfect() {
        let ids: Vec<String> = (0..30_000).map(|i| format!("CLM{:05}", i)).collect();
        let dataset = Dataset::new(vec![Column::text("claim_id", ids.iter().map(|s| Some(s.as_str())))]).unwrap();

        let mut flags = vec![ValidationFlags::new(); 30_000];
        flags[17].push(Violation::InvalidDate);
        let report = QualityScorer::score(&dataset, &flags).unwrap();
        assert_eq!(report.score, 99.99);

        let report = QualityScorer::score(&dataset, &vec![ValidationFlags::new(); 30_000]).unwrap();
        assert_eq!(report.score, 100.0);
    }

    #[test]
    fn test_empty_dataset_is_invalid_input() {
        let dataset = Dataset::new(vec![Column::text("claim_id", Vec::<Option<&str>>::new())]).unwrap();
        let res = QualityScorer::score(&dataset, &[]);
        assert!(matches!(res, Err(DomainError::InvalidInput(_))));
    }
}

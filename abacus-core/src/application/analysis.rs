// abacus-core/src/application/analysis.rs

use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::domain::dataset::{Cell, DERIVED_COLUMNS, Dataset};
use crate::domain::detection::{
    AnomalyFuser, AnomalyStats, AnomalyVerdict, EncodingContext, OutlierDetector,
};
use crate::domain::error::DomainError;
use crate::domain::project::{ProjectConfig, SampleRow};
use crate::domain::quality::{Imputer, QualityReport, QualityScorer, SchemaValidator};

/// Imputed records in ingest order, each with its verdict.
#[derive(Debug, Clone)]
pub struct AnnotatedDataset {
    dataset: Dataset,
    verdicts: Vec<AnomalyVerdict>,
}

impl AnnotatedDataset {
    pub fn row_count(&self) -> usize {
        self.dataset.row_count()
    }

    pub fn verdicts(&self) -> &[AnomalyVerdict] {
        &self.verdicts
    }

    /// JSON rows: the dataset columns followed by the derived annotation
    /// columns. `limit` keeps the first rows only.
    pub fn to_records(&self, limit: Option<usize>) -> Vec<SampleRow> {
        let rows = limit.map_or(self.row_count(), |l| l.min(self.row_count()));

        (0..rows)
            .map(|row| {
                let mut record = SampleRow::new();
                for column in self.dataset.columns() {
                    record.insert(column.name().to_string(), cell_value(&column.cells()[row]));
                }

                let verdict = &self.verdicts[row];
                let [reasons, rule, ml, any, score] = DERIVED_COLUMNS;
                record.insert(reasons.to_string(), json!(verdict.rendered_reasons()));
                record.insert(rule.to_string(), json!(verdict.structural));
                record.insert(ml.to_string(), json!(verdict.statistical));
                record.insert(any.to_string(), json!(verdict.is_anomaly()));
                record.insert(score.to_string(), json!(verdict.score));
                record
            })
            .collect()
    }
}

fn cell_value(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Text(text) => json!(text),
        Cell::Number(number) => json!(number),
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub quality_report: QualityReport,
    pub anomaly_stats: AnomalyStats,
    pub annotated: AnnotatedDataset,
}

/// Validate, score, impute, encode, detect and fuse one dataset.
///
/// Blocking and CPU bound. Every call builds its own encoding context and
/// model, so concurrent calls share nothing but `config`.
#[instrument(skip_all, fields(project = %config.name, rows = dataset.row_count()))]
pub fn analyze(dataset: Dataset, config: &ProjectConfig) -> Result<AnalysisOutcome, DomainError> {
    // Re-uploaded exports are analysed like the raw file.
    let dataset = dataset.without_columns(&DERIVED_COLUMNS);

    // 1. Flag (on raw values)
    let validator = SchemaValidator::new(&config.dataset)?;
    let flags = validator.validate(&dataset)?;

    // 2. Score
    let quality_report = QualityScorer::score(&dataset, &flags)?;

    // 3. Impute (consumes the raw dataset)
    let imputed = Imputer::impute(dataset);

    // 4. Encode + detect
    let matrix = EncodingContext::new(&config.encoding).fit_transform(&imputed)?;
    let outliers = OutlierDetector::new(&config.detection).fit_predict(&matrix)?;

    // 5. Fuse
    let (verdicts, anomaly_stats) = AnomalyFuser::fuse(flags, &outliers)?;

    info!(
        score = quality_report.score,
        anomalies = anomaly_stats.total_anomalies,
        "Dataset analysed"
    );

    Ok(AnalysisOutcome {
        quality_report,
        anomaly_stats,
        annotated: AnnotatedDataset {
            dataset: imputed.into_inner(),
            verdicts,
        },
    })
}

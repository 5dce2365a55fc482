// abacus-core/src/domain/detection/fuser.rs

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::detection::model::OutlierScores;
use crate::domain::error::DomainError;
use crate::domain::quality::scorer::round2;
use crate::domain::quality::violation::{ValidationFlags, Violation, render_reasons};

/// Final decision for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyVerdict {
    /// Structural violations first, then the statistical one if any.
    pub reasons: Vec<Violation>,
    pub structural: bool,
    pub statistical: bool,
    pub score: f64,
}

impl AnomalyVerdict {
    pub fn is_anomaly(&self) -> bool {
        self.structural || self.statistical
    }

    pub fn rendered_reasons(&self) -> String {
        render_reasons(&self.reasons)
    }
}

/// Disjoint partition of the anomalous records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyBreakdown {
    pub rule_only: usize,
    pub statistical_only: usize,
    pub both: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyStats {
    pub total_anomalies: usize,
    pub anomaly_percentage: f64,
    /// Records with at least one structural violation.
    pub rule_based_count: usize,
    /// Every statistical outlier, including those also caught by the rules.
    /// `breakdown` gives the non-overlapping counts.
    pub ml_based_count: usize,
    pub breakdown: AnomalyBreakdown,
}

pub struct AnomalyFuser;

impl AnomalyFuser {
    /// combined = structural OR statistical. Reasons are appended, never
    /// replaced.
    pub fn fuse(
        flags: Vec<ValidationFlags>,
        outliers: &OutlierScores,
    ) -> Result<(Vec<AnomalyVerdict>, AnomalyStats), DomainError> {
        if flags.len() != outliers.len() || outliers.scores.len() != outliers.len() {
            return Err(DomainError::InvalidInput(format!(
                "cannot fuse {} validation flags with {} model outputs",
                flags.len(),
                outliers.len()
            )));
        }
        if flags.is_empty() {
            return Err(DomainError::InvalidInput(
                "cannot fuse an empty dataset".to_string(),
            ));
        }

        let verdicts: Vec<AnomalyVerdict> = flags
            .into_iter()
            .zip(outliers.outliers.iter().zip(&outliers.scores))
            .map(|(flags, (&statistical, &score))| {
                let structural = flags.is_anomalous();
                let mut reasons = flags.into_reasons();
                if statistical {
                    reasons.push(Violation::StatisticalOutlier);
                }
                AnomalyVerdict {
                    reasons,
                    structural,
                    statistical,
                    score,
                }
            })
            .collect();

        let stats = Self::stats(&verdicts);
        info!(
            total = stats.total_anomalies,
            rule_only = stats.breakdown.rule_only,
            statistical_only = stats.breakdown.statistical_only,
            both = stats.breakdown.both,
            "Anomaly verdicts fused"
        );
        Ok((verdicts, stats))
    }

    pub fn stats(verdicts: &[AnomalyVerdict]) -> AnomalyStats {
        let mut breakdown = AnomalyBreakdown::default();
        for verdict in verdicts {
            match (verdict.structural, verdict.statistical) {
                (true, true) => breakdown.both += 1,
                (true, false) => breakdown.rule_only += 1,
                (false, true) => breakdown.statistical_only += 1,
                (false, false) => {}
            }
        }

        let total_anomalies = breakdown.rule_only + breakdown.statistical_only + breakdown.both;
        let anomaly_percentage = if verdicts.is_empty() {
            0.0
        } else {
            round2(total_anomalies as f64 / verdicts.len() as f64 * 100.0)
        };

        AnomalyStats {
            total_anomalies,
            anomaly_percentage,
            rule_based_count: breakdown.rule_only + breakdown.both,
            ml_based_count: breakdown.statistical_only + breakdown.both,
            breakdown,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn flags(structural: &[bool]) -> Vec<ValidationFlags> {
        structural
            .iter()
            .map(|&s| {
                let mut f = ValidationFlags::new();
                if s {
                    f.push(Violation::MissingField("dob".into()));
                }
                f
            })
            .collect()
    }

    fn outliers(statistical: &[bool]) -> OutlierScores {
        OutlierScores {
            outliers: statistical.to_vec(),
            scores: statistical.iter().map(|&s| if s { 0.8 } else { 0.4 }).collect(),
            threshold: 0.6,
        }
    }

    #[test]
    fn test_fuse_combines_and_appends_reasons() {
        let (verdicts, stats) = AnomalyFuser::fuse(
            flags(&[true, true, false, false, false, false]),
            &outliers(&[true, false, true, false, false, false]),
        )
        .unwrap();

        assert_eq!(
            verdicts[0].reasons,
            vec![
                Violation::MissingField("dob".into()),
                Violation::StatisticalOutlier
            ]
        );
        assert_eq!(
            verdicts[0].rendered_reasons(),
            "Missing dob; Statistical Outlier (ML)"
        );
        assert_eq!(verdicts[2].reasons, vec![Violation::StatisticalOutlier]);
        assert!(verdicts[3].reasons.is_empty());
        assert!(!verdicts[3].is_anomaly());

        assert_eq!(stats.total_anomalies, 3);
        assert_eq!(stats.anomaly_percentage, 50.0);
        assert_eq!(stats.rule_based_count, 2);
        assert_eq!(stats.ml_based_count, 2);
        assert_eq!(
            stats.breakdown,
            AnomalyBreakdown {
                rule_only: 1,
                statistical_only: 1,
                both: 1
            }
        );
    }

    #[test]
    fn test_percentage_is_rounded() {
        let (_, stats) = AnomalyFuser::fuse(
            flags(&[true, false, false]),
            &outliers(&[false, false, false]),
        )
        .unwrap();
        assert_eq!(stats.anomaly_percentage, 33.33);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let res = AnomalyFuser::fuse(flags(&[true, false]), &outliers(&[false]));
        assert!(matches!(res, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_breakdown_partitions_total() {
        let (verdicts, stats) = AnomalyFuser::fuse(
            flags(&[true, true, true, false, false, false, false]),
            &outliers(&[true, true, false, true, false, false, false]),
        )
        .unwrap();
        let b = stats.breakdown;
        assert_eq!(b.rule_only + b.statistical_only + b.both, stats.total_anomalies);
        assert_eq!(
            verdicts.iter().filter(|v| v.is_anomaly()).count(),
            stats.total_anomalies
        );
    }
}

// abacus-core/src/domain/quality/violation.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// One defect found on a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "column", rename_all = "snake_case")]
pub enum Violation {
    DuplicateKey,
    MissingField(String),
    InvalidPostalCode,
    InvalidDate,
    InvalidAmount(String),
    StatisticalOutlier,
}

impl Violation {
    /// Format violations feed `format_errors` in the quality report.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Violation::InvalidPostalCode | Violation::InvalidDate | Violation::InvalidAmount(_)
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DuplicateKey => write!(f, "Duplicate Claim ID"),
            Violation::MissingField(column) => write!(f, "Missing {}", column),
            Violation::InvalidPostalCode => write!(f, "Invalid ZIP Format"),
            Violation::InvalidDate => write!(f, "Invalid DOB Format"),
            Violation::InvalidAmount(column) => write!(f, "Invalid Amount Format ({})", column),
            Violation::StatisticalOutlier => write!(f, "Statistical Outlier (ML)"),
        }
    }
}

/// Append-only list of structural violations for one record.
///
/// The record is structurally anomalous as soon as one violation is pushed;
/// there is no way to remove one, so the flag can never go back to false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationFlags {
    reasons: Vec<Violation>,
}

impl ValidationFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a violation. A check contributes at most once per record, so
    /// an identical violation is not appended twice.
    pub fn push(&mut self, violation: Violation) {
        if !self.reasons.contains(&violation) {
            self.reasons.push(violation);
        }
    }

    pub fn is_anomalous(&self) -> bool {
        !self.reasons.is_empty()
    }

    pub fn reasons(&self) -> &[Violation] {
        &self.reasons
    }

    pub fn contains(&self, violation: &Violation) -> bool {
        self.reasons.contains(violation)
    }

    pub fn into_reasons(self) -> Vec<Violation> {
        self.reasons
    }
}

/// "; "-joined display form, in the order the violations were found.
pub fn render_reasons(reasons: &[Violation]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

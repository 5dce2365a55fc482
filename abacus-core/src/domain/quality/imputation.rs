// abacus-core/src/domain/quality/imputation.rs

use std::ops::Deref;
use tracing::debug;

use crate::domain::dataset::{Cell, ColumnKind, Dataset};

/// Placeholder for missing text values.
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// A fully populated dataset: numeric columns only hold numbers and text
/// columns only hold text.
///
/// Only [`Imputer::impute`] builds one, and it consumes the raw dataset, so
/// validation and scoring have to happen before (flag-then-impute).
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedDataset(Dataset);

impl ImputedDataset {
    pub fn into_inner(self) -> Dataset {
        self.0
    }
}

impl Deref for ImputedDataset {
    type Target = Dataset;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct Imputer;

impl Imputer {
    /// Numeric columns: null or unparseable cells become 0.0.
    /// Text columns: null cells become "Unknown", numbers become their text.
    pub fn impute(mut dataset: Dataset) -> ImputedDataset {
        let mut filled = 0usize;

        for column in dataset.columns_mut() {
            let kind = column.kind();
            for cell in column.cells_mut() {
                let replacement = match (kind, &*cell) {
                    (ColumnKind::Numeric, Cell::Number(_)) => None,
                    (ColumnKind::Numeric, _) => Some(Cell::Number(0.0)),
                    (ColumnKind::Text, Cell::Text(_)) => None,
                    (ColumnKind::Text, Cell::Null) => Some(Cell::Text(UNKNOWN_PLACEHOLDER.to_string())),
                    (ColumnKind::Text, Cell::Number(v)) => Some(Cell::Text(v.to_string())),
                };
                if let Some(value) = replacement {
                    *cell = value;
                    filled += 1;
                }
            }
        }

        debug!(cells = filled, "Imputation finished");
        ImputedDataset(dataset)
    }
}

// abacus-core/src/domain/quality/validator.rs

use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::domain::dataset::table::parse_decimal;
use crate::domain::dataset::{Cell, Column, ColumnKind, Dataset, DatasetRules};
use crate::domain::error::DomainError;
use crate::domain::quality::violation::{ValidationFlags, Violation};

/// Rule engine for structural defects.
///
/// Checks run in a fixed order (duplicate key, missing required fields,
/// postal code, date, amount) and each one may add a single violation per
/// record. Values are only read, never altered.
pub struct SchemaValidator {
    rules: DatasetRules,
    postal_code: Regex,
    date: Regex,
}

impl SchemaValidator {
    pub fn new(rules: &DatasetRules) -> Result<Self, DomainError> {
        let postal_code =
            Regex::new(&rules.postal_code_pattern).map_err(|source| DomainError::InvalidPattern {
                field: "postal_code_pattern".to_string(),
                source,
            })?;
        let date = Regex::new(&rules.date_pattern).map_err(|source| DomainError::InvalidPattern {
            field: "date_pattern".to_string(),
            source,
        })?;

        Ok(Self {
            rules: rules.clone(),
            postal_code,
            date,
        })
    }

    #[instrument(skip_all, fields(rows = dataset.row_count()))]
    pub fn validate(&self, dataset: &Dataset) -> Result<Vec<ValidationFlags>, DomainError> {
        if dataset.is_empty() {
            return Err(DomainError::InvalidInput(
                "dataset has no rows".to_string(),
            ));
        }
        self.ensure_columns(dataset)?;

        let mut flags = vec![ValidationFlags::new(); dataset.row_count()];

        // 1. Duplicate keys (every occurrence)
        let ids = self.require(dataset, &self.rules.id_column)?;
        flag_duplicates(ids, &mut flags);

        // 2. Missing required fields
        for field in &self.rules.required_fields {
            let column = self.require(dataset, field)?;
            for (row, cell) in column.cells().iter().enumerate() {
                if cell.is_missing() {
                    flags[row].push(Violation::MissingField(field.clone()));
                }
            }
        }

        // 3. Postal code format (nulls already reported as missing)
        if let Some(name) = &self.rules.postal_code_column {
            let column = self.require(dataset, name)?;
            flag_pattern(column, &self.postal_code, Violation::InvalidPostalCode, &mut flags);
        }

        // 4. Date format
        if let Some(name) = &self.rules.date_column {
            let column = self.require(dataset, name)?;
            flag_pattern(column, &self.date, Violation::InvalidDate, &mut flags);
        }

        // 5. Amounts that did not parse as finite decimals
        for name in &self.rules.amount_columns {
            let column = self.require(dataset, name)?;
            for (row, cell) in column.cells().iter().enumerate() {
                if is_malformed_amount(column.kind(), cell) {
                    flags[row].push(Violation::InvalidAmount(name.clone()));
                }
            }
        }

        debug!(
            flagged = flags.iter().filter(|f| f.is_anomalous()).count(),
            "Structural validation finished"
        );
        Ok(flags)
    }

    fn ensure_columns(&self, dataset: &Dataset) -> Result<(), DomainError> {
        let missing: Vec<&str> = self
            .rules
            .referenced_columns()
            .into_iter()
            .filter(|c| dataset.column(c).is_none())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::InvalidInput(format!(
                "missing required columns: {}",
                missing.join(", ")
            )))
        }
    }

    fn require<'d>(&self, dataset: &'d Dataset, name: &str) -> Result<&'d Column, DomainError> {
        dataset
            .column(name)
            .ok_or_else(|| DomainError::InvalidInput(format!("missing required column '{}'", name)))
    }
}

fn flag_duplicates(ids: &Column, flags: &mut [ValidationFlags]) {
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    for cell in ids.cells() {
        if let Some(key) = identifier_key(cell) {
            *occurrences.entry(key).or_default() += 1;
        }
    }

    for (row, cell) in ids.cells().iter().enumerate() {
        if let Some(key) = identifier_key(cell)
            && occurrences.get(&key).copied().unwrap_or(0) > 1
        {
            flags[row].push(Violation::DuplicateKey);
        }
    }
}

// Null identifiers are not keys and never collide with each other.
fn identifier_key(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Null => None,
        other => Some(other.render()),
    }
}

fn flag_pattern(column: &Column, pattern: &Regex, violation: Violation, flags: &mut [ValidationFlags]) {
    for (row, cell) in column.cells().iter().enumerate() {
        if cell.is_null() {
            continue;
        }
        if !pattern.is_match(&cell.render()) {
            flags[row].push(violation.clone());
        }
    }
}

fn is_malformed_amount(kind: ColumnKind, cell: &Cell) -> bool {
    match cell {
        Cell::Null | Cell::Number(_) => false,
        Cell::Text(raw) => kind == ColumnKind::Numeric || parse_decimal(raw).is_none(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::test_support::scenario_dataset;

    fn validator() -> SchemaValidator {
        SchemaValidator::new(&DatasetRules::default()).unwrap()
    }

    #[test]
    fn test_scenario_flags_four_rows() {
        let flags = validator().validate(&scenario_dataset()).unwrap();
        assert_eq!(flags.len(), 10);

        let flagged: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_anomalous())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(flagged, vec![2, 4, 6, 8]);

        assert_eq!(flags[2].reasons(), &[Violation::DuplicateKey]);
        assert_eq!(flags[8].reasons(), &[Violation::DuplicateKey]);
        assert_eq!(flags[4].reasons(), &[Violation::InvalidPostalCode]);
        assert_eq!(
            flags[6].reasons(),
            &[Violation::MissingField("patient_name".into())]
        );
    }

    #[test]
    fn test_all_duplicate_occurrences_flagged() {
        let dataset = Dataset::new(vec![
            Column::text("claim_id", [Some("A"), Some("B"), Some("A"), Some("A"), None, None]),
            Column::text("patient_name", ["p"; 6].map(Some)),
            Column::text("dob", ["2020-01-01"; 6].map(Some)),
            Column::text("zip_code", ["12345"; 6].map(Some)),
            Column::numeric("claim_amount", [1.0; 6].map(Some)),
        ])
        .unwrap();

        let flags = validator().validate(&dataset).unwrap();
        let dupes: Vec<bool> = flags
            .iter()
            .map(|f| f.contains(&Violation::DuplicateKey))
            .collect();
        assert_eq!(dupes, vec![true, false, true, true, false, false]);
    }

    #[test]
    fn test_missing_field_not_double_flagged_as_format_error() {
        let dataset = Dataset::new(vec![
            Column::text("claim_id", [Some("A"), Some("B")]),
            Column::text("patient_name", [Some("p"), Some("q")]),
            Column::text("dob", [None, Some("01/01/2020")]),
            Column::text("zip_code", [None::<&str>, Some("ABCDE")]),
            Column::numeric("claim_amount", [Some(1.0), None]),
        ])
        .unwrap();

        let flags = validator().validate(&dataset).unwrap();
        assert_eq!(
            flags[0].reasons(),
            &[
                Violation::MissingField("dob".into()),
                Violation::MissingField("zip_code".into()),
            ]
        );
        assert_eq!(
            flags[1].reasons(),
            &[Violation::InvalidPostalCode, Violation::InvalidDate]
        );
    }

    #[test]
    fn test_blank_postal_code_is_missing_and_malformed() {
        let dataset = Dataset::new(vec![
            Column::text("claim_id", [Some("A")]),
            Column::text("patient_name", [Some("p")]),
            Column::text("dob", [Some("2020-01-01")]),
            Column::text("zip_code", [Some("")]),
            Column::numeric("claim_amount", [Some(1.0)]),
        ])
        .unwrap();

        let flags = validator().validate(&dataset).unwrap();
        assert_eq!(
            flags[0].reasons(),
            &[
                Violation::MissingField("zip_code".into()),
                Violation::InvalidPostalCode,
            ]
        );
    }

    #[test]
    fn test_malformed_postal_codes_always_flagged() {
        let zips = ["1234", "123456", "12a45", "١٢٣٤٥", " 12345", "12345"];
        let dataset = Dataset::new(vec![
            Column::text("claim_id", ["1", "2", "3", "4", "5", "6"].map(Some)),
            Column::text("patient_name", ["p"; 6].map(Some)),
            Column::text("dob", ["2020-01-01"; 6].map(Some)),
            Column::text("zip_code", zips.map(Some)),
            Column::numeric("claim_amount", [1.0; 6].map(Some)),
        ])
        .unwrap();

        let flags = validator().validate(&dataset).unwrap();
        let invalid: Vec<bool> = flags
            .iter()
            .map(|f| f.contains(&Violation::InvalidPostalCode))
            .collect();
        assert_eq!(invalid, vec![true, true, true, true, true, false]);
    }

    #[test]
    fn test_unparseable_amount_flagged() {
        let dataset = Dataset::new(vec![
            Column::text("claim_id", [Some("A"), Some("B")]),
            Column::text("patient_name", [Some("p"), Some("q")]),
            Column::text("dob", [Some("2020-01-01"), Some("2020-01-02")]),
            Column::text("zip_code", [Some("12345"), Some("54321")]),
            Column::new(
                "claim_amount",
                ColumnKind::Numeric,
                vec![Cell::Number(10.0), Cell::Text("ten".into())],
            ),
        ])
        .unwrap();

        let flags = validator().validate(&dataset).unwrap();
        assert!(!flags[0].is_anomalous());
        assert_eq!(
            flags[1].reasons(),
            &[Violation::InvalidAmount("claim_amount".into())]
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let dataset = scenario_dataset();
        let first = validator().validate(&dataset).unwrap();
        let second = validator().validate(&dataset).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let dataset = Dataset::new(vec![
            Column::text("claim_id", Vec::<Option<&str>>::new()),
        ])
        .unwrap();
        let res = validator().validate(&dataset);
        assert!(matches!(res, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_required_column_rejected() {
        let dataset = scenario_dataset().without_columns(&["dob"]);
        let res = validator().validate(&dataset);
        assert!(matches!(res, Err(DomainError::InvalidInput(msg)) if msg.contains("dob")));
    }

    #[test]
    fn test_invalid_configured_pattern() {
        let rules = DatasetRules {
            postal_code_pattern: "([0-9".to_string(),
            ..DatasetRules::default()
        };
        assert!(matches!(
            SchemaValidator::new(&rules),
            Err(DomainError::InvalidPattern { .. })
        ));
    }
}

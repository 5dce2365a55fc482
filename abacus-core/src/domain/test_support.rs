// abacus-core/src/domain/test_support.rs
//
// Shared fixtures for the domain unit tests.

#![allow(clippy::unwrap_used)]

use crate::domain::dataset::{Column, Dataset};

/// 10 claims: CLM03 appears twice, row 5 has a 3-digit ZIP, row 7 has no
/// patient name.
pub(crate) fn scenario_dataset() -> Dataset {
    Dataset::new(vec![
        Column::text(
            "claim_id",
            [
                "CLM01", "CLM02", "CLM03", "CLM04", "CLM05", "CLM06", "CLM07", "CLM08",
                "CLM03", "CLM10",
            ]
            .map(Some),
        ),
        Column::text(
            "patient_name",
            [
                Some("Patient_1"),
                Some("Patient_2"),
                Some("Patient_3"),
                Some("Patient_4"),
                Some("Patient_5"),
                Some("Patient_6"),
                None,
                Some("Patient_8"),
                Some("Patient_3"),
                Some("Patient_10"),
            ],
        ),
        Column::text(
            "dob",
            [
                "1970-01-01", "1980-02-02", "1990-03-03", "1965-04-04", "1975-05-05",
                "1985-06-06", "1995-07-07", "1960-08-08", "1990-03-03", "1972-10-10",
            ]
            .map(Some),
        ),
        Column::text(
            "zip_code",
            [
                "98101", "98102", "98103", "98104", "123", "98106", "98107", "98108",
                "98103", "98110",
            ]
            .map(Some),
        ),
        Column::numeric(
            "claim_amount",
            [
                1200.0, 2500.5, 3100.0, 980.0, 4100.0, 2200.0, 1750.0, 3300.0, 3100.0,
                2900.0,
            ]
            .map(Some),
        ),
        Column::text(
            "diagnosis_code",
            ["A01", "B02", "C03", "D04", "E05", "A01", "B02", "C03", "C03", "E05"].map(Some),
        ),
    ])
    .unwrap()
}

/// 5 well-formed, unique claims.
pub(crate) fn clean_dataset() -> Dataset {
    Dataset::new(vec![
        Column::text("claim_id", ["CLM01", "CLM02", "CLM03", "CLM04", "CLM05"].map(Some)),
        Column::text(
            "patient_name",
            ["Patient_1", "Patient_2", "Patient_3", "Patient_4", "Patient_5"].map(Some),
        ),
        Column::text(
            "dob",
            ["1970-01-01", "1980-02-02", "1990-03-03", "1965-04-04", "1975-05-05"].map(Some),
        ),
        Column::text("zip_code", ["98101", "98102", "98103", "98104", "98105"].map(Some)),
        Column::numeric("claim_amount", [1200.0, 2500.5, 3100.0, 980.0, 4100.0].map(Some)),
        Column::text("diagnosis_code", ["A01", "B02", "C03", "D04", "E05"].map(Some)),
    ])
    .unwrap()
}

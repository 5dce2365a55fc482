// abacus/src/commands/generate.rs
//
// USE CASE: Synthetic claims file for demos and manual testing.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

const HEADER: [&str; 6] = [
    "claim_id",
    "patient_name",
    "dob",
    "zip_code",
    "claim_amount",
    "diagnosis_code",
];
const DIAGNOSIS_CODES: [&str; 5] = ["A01", "B02", "C03", "D04", "E05"];

type Claim = [Option<String>; 6];

pub fn execute(output: PathBuf, rows: usize, seed: u64) -> anyhow::Result<()> {
    println!("🎲 Generating {} claims (seed {})...", rows, seed);

    let claims = generate_claims(rows, seed)?;
    let csv = to_csv(&claims)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, csv).with_context(|| format!("Failed to write {:?}", output))?;

    println!("✨ Saved {} rows to {}", claims.len(), output.display());
    Ok(())
}

/// Clean base claims, then injected defects: 5% duplicated claims, 5% nulls
/// per personal field, 2% broken dates, 3% alphanumeric and 2% short ZIPs,
/// 2% amounts multiplied by 100.
fn generate_claims(rows: usize, seed: u64) -> anyhow::Result<Vec<Claim>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let reference = NaiveDate::from_ymd_opt(2020, 1, 1).context("invalid reference date")?;

    let mut claims: Vec<Claim> = Vec::with_capacity(rows + rows / 20);
    for i in 1..=rows {
        let dob = reference
            .checked_sub_days(Days::new(rng.gen_range(365 * 20..=365 * 80)))
            .context("date of birth out of range")?;
        let amount = lognormal(&mut rng, 8.0, 1.0);
        claims.push([
            Some(format!("CLM{:05}", i)),
            Some(format!("Patient_{}", i - 1)),
            Some(dob.format("%Y-%m-%d").to_string()),
            Some(rng.gen_range(10000..=99999).to_string()),
            Some(format!("{:.2}", amount)),
            Some(DIAGNOSIS_CODES[rng.gen_range(0..DIAGNOSIS_CODES.len())].to_string()),
        ]);
    }

    // A. Duplicates, shuffled in
    let dupes = rows / 20;
    if dupes > 0 {
        let copies: Vec<Claim> = sample(&mut rng, rows, dupes)
            .iter()
            .map(|i| claims[i].clone())
            .collect();
        claims.extend(copies);
        claims.shuffle(&mut rng);
    }

    // B. Nulls in patient_name, dob, zip_code
    for field in 1..=3 {
        for claim in claims.iter_mut() {
            if rng.gen_bool(0.05) {
                claim[field] = None;
            }
        }
    }

    // C. Format defects
    for claim in claims.iter_mut() {
        if rng.gen_bool(0.02) {
            claim[2] = Some("Invalid_Date".to_string());
        }
    }
    for claim in claims.iter_mut() {
        if rng.gen_bool(0.03) {
            claim[3] = Some("ABCDE".to_string());
        }
    }
    for claim in claims.iter_mut() {
        if rng.gen_bool(0.02) {
            claim[3] = Some("123".to_string());
        }
    }

    // D. Amount outliers
    let outliers = rows / 50;
    if outliers > 0 {
        for i in sample(&mut rng, claims.len(), outliers).iter() {
            if let Some(amount) = claims[i][4].as_deref().and_then(|a| a.parse::<f64>().ok()) {
                claims[i][4] = Some(format!("{:.2}", amount * 100.0));
            }
        }
    }

    Ok(claims)
}

/// Box-Muller on two uniforms.
fn lognormal(rng: &mut StdRng, mean: f64, sigma: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    (mean + sigma * z).exp()
}

/// Nulls are written as empty fields.
fn to_csv(claims: &[Claim]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for claim in claims {
        writer.write_record(claim.iter().map(|v| v.as_deref().unwrap_or("")))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_row_count_includes_duplicates() {
        let claims = generate_claims(100, 42).unwrap();
        assert_eq!(claims.len(), 105);

        let ids: HashSet<&str> = claims.iter().filter_map(|c| c[0].as_deref()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_same_seed_same_file() {
        let a = to_csv(&generate_claims(200, 7).unwrap()).unwrap();
        let b = to_csv(&generate_claims(200, 7).unwrap()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, to_csv(&generate_claims(200, 8).unwrap()).unwrap());
    }

    #[test]
    fn test_csv_shape() {
        let csv = to_csv(&generate_claims(40, 1).unwrap()).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_slice());
        let header: Vec<&str> = reader.headers().unwrap().iter().collect();
        assert_eq!(header, HEADER.to_vec());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 40 + 2);
        assert!(records.iter().all(|r| r.len() == 6));
    }

    #[test]
    fn test_csv_quotes_separators() {
        let claim: Claim = [
            Some("CLM00001".to_string()),
            Some("Doe, John \"JD\"".to_string()),
            None,
            Some("02134".to_string()),
            Some("120.50".to_string()),
            Some("A01".to_string()),
        ];
        let csv = to_csv(&[claim]).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_slice());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 6);
        assert_eq!(&record[1], "Doe, John \"JD\"");
        assert_eq!(&record[2], "");
        assert_eq!(&record[3], "02134");
    }

    #[test]
    fn test_small_file_has_no_injected_rows() {
        let claims = generate_claims(10, 42).unwrap();
        assert_eq!(claims.len(), 10);
        assert!(claims.iter().all(|c| c[0].is_some() && c[4].is_some()));
    }
}

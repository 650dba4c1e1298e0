//! Claims ingestion - reads the claims CSV into typed records
//!
//! Rows that cannot be used downstream are dropped here and counted:
//! a missing field, a month that is not a valid `YYYYMM` code, or a paid
//! amount that is not a positive number.

use crate::canonicalize::LabeledRow;
use crate::error::{CanonError, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "MONTH",
    "SERVICE_CATEGORY",
    "CLAIM_SPECIALTY",
    "PAYER",
    "PAID_AMOUNT",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimRecord {
    /// Period code, `YYYYMM`
    pub month: u32,
    pub service_category: String,
    pub claim_specialty: String,
    pub payer: String,
    pub paid_amount: f64,
}

impl LabeledRow for ClaimRecord {
    fn label(&self) -> &str {
        &self.claim_specialty
    }

    fn set_label(&mut self, label: String) {
        self.claim_specialty = label;
    }
}

#[derive(Debug, Deserialize)]
struct RawClaim {
    #[serde(rename = "MONTH")]
    month: Option<String>,
    #[serde(rename = "SERVICE_CATEGORY")]
    service_category: Option<String>,
    #[serde(rename = "CLAIM_SPECIALTY")]
    claim_specialty: Option<String>,
    #[serde(rename = "PAYER")]
    payer: Option<String>,
    #[serde(rename = "PAID_AMOUNT")]
    paid_amount: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped_missing: usize,
    pub dropped_bad_month: usize,
    pub dropped_bad_amount: usize,
}

#[derive(Debug, Clone)]
pub struct Ingested {
    pub records: Vec<ClaimRecord>,
    pub stats: IngestStats,
}

/// Parse a `YYYYMM` period code. The code must name a real calendar month.
pub fn parse_month(code: &str) -> Option<u32> {
    let code = code.trim();
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{}01", code), "%Y%m%d").ok()?;
    code.parse().ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn load_claims<R: Read>(reader: R) -> Result<Ingested> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(CanonError::Ingestion(format!(
            "Claims file is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut stats = IngestStats::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<RawClaim>() {
        let raw = result?;
        stats.rows_read += 1;

        let (Some(month), Some(service_category), Some(claim_specialty), Some(payer), Some(amount)) = (
            non_blank(raw.month),
            non_blank(raw.service_category),
            non_blank(raw.claim_specialty),
            non_blank(raw.payer),
            non_blank(raw.paid_amount),
        ) else {
            stats.dropped_missing += 1;
            continue;
        };

        let Some(month) = parse_month(&month) else {
            debug!("Dropping row {}: bad month code '{}'", stats.rows_read, month);
            stats.dropped_bad_month += 1;
            continue;
        };

        let paid_amount = match amount.parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => value,
            _ => {
                debug!("Dropping row {}: unusable paid amount '{}'", stats.rows_read, amount);
                stats.dropped_bad_amount += 1;
                continue;
            }
        };

        records.push(ClaimRecord {
            month,
            service_category,
            claim_specialty,
            payer,
            paid_amount,
        });
    }

    stats.rows_kept = records.len();
    info!(
        "Loaded {} of {} claim rows ({} missing fields, {} bad months, {} bad amounts)",
        stats.rows_kept,
        stats.rows_read,
        stats.dropped_missing,
        stats.dropped_bad_month,
        stats.dropped_bad_amount
    );

    Ok(Ingested { records, stats })
}

pub fn load_claims_file(path: &Path) -> Result<Ingested> {
    let file = File::open(path).map_err(|e| {
        CanonError::Ingestion(format!("Failed to open {}: {}", path.display(), e))
    })?;
    load_claims(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
MONTH,SERVICE_CATEGORY,CLAIM_SPECIALTY,PAYER,PAID_AMOUNT
201801,Outpatient,Cardiology & Surgery,Payer A,120.5
201802,Inpatient,CARDIOLOGY/SURGERY,Payer B,300
201813,Inpatient,Oncology,Payer A,50
201803,Inpatient,,Payer A,50
201803,Inpatient,Oncology,Payer A,0
201803,Inpatient,Oncology,Payer A,-12
201803,Inpatient,Oncology,Payer A,abc
";

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("201802"), Some(201802));
        assert_eq!(parse_month(" 201812 "), Some(201812));
        assert!(parse_month("201813").is_none());
        assert!(parse_month("201800").is_none());
        assert!(parse_month("2018-02").is_none());
        assert!(parse_month("").is_none());
    }

    #[test]
    fn test_row_exclusion() {
        let ingested = load_claims(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ingested.records.len(), 2);
        assert_eq!(
            ingested.stats,
            IngestStats {
                rows_read: 7,
                rows_kept: 2,
                dropped_missing: 1,
                dropped_bad_month: 1,
                dropped_bad_amount: 3,
            }
        );
        let first = &ingested.records[0];
        assert_eq!(first.claim_specialty, "Cardiology & Surgery");
        assert_eq!(first.month, 201801);
        assert_eq!(first.paid_amount, 120.5);
    }

    #[test]
    fn test_missing_column_is_error() {
        let csv = "MONTH,PAYER,PAID_AMOUNT\n201801,Payer A,10\n";
        match load_claims(csv.as_bytes()) {
            Err(CanonError::Ingestion(msg)) => {
                assert!(msg.contains("SERVICE_CATEGORY"));
                assert!(msg.contains("CLAIM_SPECIALTY"));
            }
            other => panic!("expected ingestion error, got {:?}", other.map(|i| i.stats)),
        }
    }

    #[test]
    fn test_labeled_row() {
        let mut record = load_claims(SAMPLE.as_bytes()).unwrap().records.remove(0);
        record.set_label("CARDIOLOGY SURGERY".to_string());
        assert_eq!(record.label(), "CARDIOLOGY SURGERY");
    }
}

//! Claim filtering by period, payer, service category and specialty

use crate::error::{CanonError, Result};
use crate::ingestion::ClaimRecord;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeSet, HashSet};

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Which values of a column pass the filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    /// An empty set selects nothing
    Only(HashSet<String>),
}

impl Selection {
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(values.into_iter().map(Into::into).collect())
    }

    /// `All` when no values were given, otherwise `Only` those values.
    pub fn from_values(values: Vec<String>) -> Self {
        if values.is_empty() {
            Selection::All
        } else {
            Selection::Only(values.into_iter().collect())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => values.contains(value),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    /// Inclusive `YYYYMM` bounds
    pub start_month: Option<u32>,
    pub end_month: Option<u32>,
    pub payers: Selection,
    pub service_categories: Selection,
    pub specialties: Selection,
}

impl ClaimFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Period bounds from ISO dates; only year and month are used.
    pub fn with_period(mut self, start: Option<&str>, end: Option<&str>) -> Result<Self> {
        self.start_month = start.map(iso_to_month).transpose()?;
        self.end_month = end.map(iso_to_month).transpose()?;
        if let (Some(start), Some(end)) = (self.start_month, self.end_month) {
            if start > end {
                return Err(CanonError::Filter(format!(
                    "Period start {} is after period end {}",
                    start, end
                )));
            }
        }
        Ok(self)
    }

    pub fn with_payers(mut self, payers: Selection) -> Self {
        self.payers = payers;
        self
    }

    pub fn with_service_categories(mut self, categories: Selection) -> Self {
        self.service_categories = categories;
        self
    }

    pub fn with_specialties(mut self, specialties: Selection) -> Self {
        self.specialties = specialties;
        self
    }

    pub fn matches(&self, record: &ClaimRecord) -> bool {
        self.start_month.map_or(true, |start| record.month >= start)
            && self.end_month.map_or(true, |end| record.month <= end)
            && self.payers.matches(&record.payer)
            && self.service_categories.matches(&record.service_category)
            && self.specialties.matches(&record.claim_specialty)
    }

    pub fn apply<'a>(&self, records: &'a [ClaimRecord]) -> Vec<&'a ClaimRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// `2018-02-15` -> `201802`
pub fn iso_to_month(date: &str) -> Result<u32> {
    let parsed = NaiveDate::parse_from_str(date.trim(), ISO_FORMAT)
        .map_err(|e| CanonError::Filter(format!("Invalid date '{}': {}", date, e)))?;
    Ok(parsed.year() as u32 * 100 + parsed.month())
}

/// `201802` -> `2018-02-01`
pub fn month_to_iso(month: u32) -> Result<String> {
    NaiveDate::from_ymd_opt((month / 100) as i32, month % 100, 1)
        .map(|d| d.format(ISO_FORMAT).to_string())
        .ok_or_else(|| CanonError::Filter(format!("Invalid month code {}", month)))
}

/// Sorted distinct values of one column.
pub fn distinct_values<F>(records: &[ClaimRecord], column: F) -> Vec<String>
where
    F: Fn(&ClaimRecord) -> &str,
{
    records
        .iter()
        .map(|r| column(r).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

//! Paid-amount aggregation over canonicalized claims

use crate::ingestion::ClaimRecord;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialtySummary {
    pub claim_specialty: String,
    pub sum: f64,
    pub count: usize,
}

/// Totals for one value of a claim column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub sum: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: u32,
    pub sum: f64,
    pub count: usize,
}

fn fold_paid<'a, I, K, F>(records: I, key: F) -> BTreeMap<K, (f64, usize)>
where
    I: IntoIterator<Item = &'a ClaimRecord>,
    K: Ord,
    F: Fn(&'a ClaimRecord) -> K,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(key(record)).or_default();
        entry.0 += record.paid_amount;
        entry.1 += 1;
    }
    groups
}

/// SUM and COUNT of paid amounts per value of `column`, ordered by value.
pub fn summarize_by<'a, I, F>(records: I, column: F) -> Vec<GroupTotal>
where
    I: IntoIterator<Item = &'a ClaimRecord>,
    F: Fn(&'a ClaimRecord) -> &'a str,
{
    fold_paid(records, column)
        .into_iter()
        .map(|(key, (sum, count))| GroupTotal {
            key: key.to_string(),
            sum,
            count,
        })
        .collect()
}

/// SUM and COUNT of paid amounts per specialty, ordered by specialty.
pub fn summarize_by_specialty<'a, I>(records: I) -> Vec<SpecialtySummary>
where
    I: IntoIterator<Item = &'a ClaimRecord>,
{
    summarize_by(records, |r| r.claim_specialty.as_str())
        .into_iter()
        .map(|group| SpecialtySummary {
            claim_specialty: group.key,
            sum: group.sum,
            count: group.count,
        })
        .collect()
}

pub fn summarize_by_service_category<'a, I>(records: I) -> Vec<GroupTotal>
where
    I: IntoIterator<Item = &'a ClaimRecord>,
{
    summarize_by(records, |r| r.service_category.as_str())
}

pub fn summarize_by_payer<'a, I>(records: I) -> Vec<GroupTotal>
where
    I: IntoIterator<Item = &'a ClaimRecord>,
{
    summarize_by(records, |r| r.payer.as_str())
}

/// SUM and COUNT of paid amounts per month, ascending.
pub fn monthly_totals<'a, I>(records: I) -> Vec<MonthlyTotal>
where
    I: IntoIterator<Item = &'a ClaimRecord>,
{
    fold_paid(records, |r| r.month)
        .into_iter()
        .map(|(month, (sum, count))| MonthlyTotal { month, sum, count })
        .collect()
}

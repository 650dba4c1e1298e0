//! Canonicalization Driver
//!
//! Runs the whole label pipeline over a row population:
//! normalize -> dedupe -> fuzzy clustering -> absorption.
//! Each distinct raw label is processed once and the result is broadcast to
//! every row carrying it. Rows other than their label pass through untouched.

use crate::absorber::absorb;
use crate::config::CanonConfig;
use crate::dedup::dedupe;
use crate::error::Result;
use crate::fuzzy_matcher::FuzzyMatcher;
use crate::label_map::LabelMap;
use crate::normalizer::TextNormalizer;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// A row with a free-text label the engine may rewrite
pub trait LabeledRow {
    fn label(&self) -> &str;
    fn set_label(&mut self, label: String);
}

impl LabeledRow for String {
    fn label(&self) -> &str {
        self
    }

    fn set_label(&mut self, label: String) {
        *self = label;
    }
}

/// Output of one canonicalization run
#[derive(Debug, Clone, Serialize)]
pub struct Canonicalization<R> {
    /// Surviving rows, labels rewritten, input order kept
    #[serde(skip)]
    pub rows: Vec<R>,
    pub synonym_map: LabelMap,
    pub substring_map: LabelMap,
    pub canonical_labels: BTreeSet<String>,
    /// Raw label as supplied -> canonical label
    pub raw_to_canonical: BTreeMap<String, String>,
    /// Rows whose label was empty after normalization
    pub dropped_rows: usize,
}

impl<R> Canonicalization<R> {
    /// Canonical label for a raw value seen in this run.
    pub fn canonical_for(&self, raw: &str) -> Option<&str> {
        self.raw_to_canonical.get(raw).map(String::as_str)
    }
}

pub struct Canonicalizer {
    normalizer: TextNormalizer,
    matcher: FuzzyMatcher,
}

impl Canonicalizer {
    pub fn new(config: &CanonConfig) -> Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::from_config(config)?,
            matcher: FuzzyMatcher::from_config(config),
        })
    }

    /// Normalized and deduplicated form of a single label.
    pub fn clean(&self, raw: &str) -> String {
        dedupe(&self.normalizer.normalize(raw))
    }

    pub fn canonicalize<R: LabeledRow>(&self, rows: Vec<R>) -> Canonicalization<R> {
        info!("Canonicalizing labels for {} rows", rows.len());

        let cleaned: BTreeMap<String, String> = rows
            .iter()
            .map(|row| row.label())
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(|raw| (raw.to_string(), self.clean(raw)))
            .collect();

        let deduped: BTreeSet<String> = cleaned
            .values()
            .filter(|label| !label.is_empty())
            .cloned()
            .collect();
        debug!(
            "{} distinct raw labels reduced to {} after normalization",
            cleaned.len(),
            deduped.len()
        );

        let synonym_map = self.matcher.cluster(&deduped);
        let clustered = synonym_map.apply(&deduped);

        let substring_map = absorb(&clustered);
        let canonical_labels = substring_map.apply(&clustered);

        let raw_to_canonical: BTreeMap<String, String> = cleaned
            .into_iter()
            .filter(|(_, label)| !label.is_empty())
            .map(|(raw, label)| {
                let canonical = substring_map.resolve(synonym_map.resolve(&label)).to_string();
                (raw, canonical)
            })
            .collect();

        let total = rows.len();
        let rows: Vec<R> = rows
            .into_iter()
            .filter_map(|mut row| {
                let canonical = raw_to_canonical.get(row.label())?.clone();
                row.set_label(canonical);
                Some(row)
            })
            .collect();
        let dropped_rows = total - rows.len();

        info!(
            "Canonicalization produced {} labels ({} synonym merges, {} absorptions, {} rows dropped)",
            canonical_labels.len(),
            synonym_map.len(),
            substring_map.len(),
            dropped_rows
        );

        Canonicalization {
            rows,
            synonym_map,
            substring_map,
            canonical_labels,
            raw_to_canonical,
            dropped_rows,
        }
    }

    /// Canonicalize a bare label column.
    pub fn canonicalize_labels(&self, labels: &[&str]) -> Canonicalization<String> {
        self.canonicalize(labels.iter().map(|s| s.to_string()).collect())
    }
}

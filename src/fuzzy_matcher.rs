use crate::config::CanonConfig;
use crate::label_map::LabelMap;
use std::collections::BTreeSet;
use strsim::normalized_levenshtein;
use tracing::{debug, info};

/// Similarity between two labels on a 0-100 scale.
///
/// Levenshtein distance over characters, normalized by the longer label and
/// rounded to the nearest integer. Two empty labels score 100.
pub fn similarity(a: &str, b: &str) -> u8 {
    (normalized_levenshtein(a, b) * 100.0).round() as u8
}

/// Fuzzy matcher that folds near-duplicate spellings into one representative
pub struct FuzzyMatcher {
    /// Scores strictly above this are merged (0-100)
    pub match_threshold: u8,
    /// Labels shorter than this are left out of fuzzy comparison
    pub min_length: usize,
    /// Candidates kept per label once the label itself is excluded
    pub top_k: usize,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            match_threshold: 90,
            min_length: 3,
            top_k: 3,
        }
    }
}

impl FuzzyMatcher {
    pub fn new(match_threshold: u8) -> Self {
        Self {
            match_threshold,
            ..Self::default()
        }
    }

    pub fn from_config(config: &CanonConfig) -> Self {
        Self {
            match_threshold: config.match_threshold,
            min_length: config.min_length,
            top_k: config.top_k,
        }
    }

    pub fn is_match(&self, a: &str, b: &str) -> bool {
        similarity(a, b) > self.match_threshold
    }

    /// Best `top_k` matches for `target` among `labels`, highest score first.
    /// Equal scores keep the order of `labels`.
    pub fn rank_candidates(&self, target: &str, labels: &[&str]) -> Vec<FuzzyMatch> {
        let mut scored: Vec<FuzzyMatch> = labels
            .iter()
            .filter(|label| **label != target)
            .map(|label| FuzzyMatch {
                label: label.to_string(),
                score: similarity(target, label),
            })
            .collect();
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(self.top_k);
        scored
    }

    /// Build the synonym map over a distinct label set.
    ///
    /// Labels are visited in ascending order. Each label not yet mapped
    /// becomes the representative of every candidate scoring above the
    /// threshold; a candidate claimed twice keeps the last claim. Keys that
    /// also ended up as representatives are dropped afterwards.
    pub fn cluster(&self, distinct: &BTreeSet<String>) -> LabelMap {
        let eligible: Vec<&str> = distinct
            .iter()
            .map(String::as_str)
            .filter(|label| label.chars().count() >= self.min_length)
            .collect();

        debug!(
            "Fuzzy clustering {} of {} distinct labels (min_length={}, threshold={}, top_k={})",
            eligible.len(),
            distinct.len(),
            self.min_length,
            self.match_threshold,
            self.top_k
        );

        let candidates: Vec<Vec<FuzzyMatch>> = eligible
            .iter()
            .map(|label| self.rank_candidates(label, &eligible))
            .collect();

        let mut synonyms = LabelMap::new();
        for (val, matches) in eligible.iter().zip(&candidates) {
            if synonyms.contains_key(val) {
                continue;
            }
            for candidate in matches {
                if candidate.score <= self.match_threshold {
                    continue;
                }
                if let Some(previous) = synonyms.insert(candidate.label.as_str(), *val) {
                    if previous != *val {
                        debug!(
                            "'{}' reassigned from '{}' to '{}' (score {})",
                            candidate.label, previous, val, candidate.score
                        );
                    }
                }
            }
        }

        let chained = synonyms.remove_chained_keys();
        if !chained.is_empty() {
            debug!("Dropped {} chained synonym keys: {:?}", chained.len(), chained);
        }

        info!("Fuzzy clustering mapped {} labels", synonyms.len());
        synonyms
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub label: String,
    pub score: u8,
}

//! Engine configuration
//!
//! Every knob of the canonicalization engine lives here. Values are layered:
//! built-in defaults, then an optional JSON file, then explicit overrides
//! from the caller (the CLI applies its flags last).

use crate::error::{CanonError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

lazy_static::lazy_static! {
    /// Separator substrings in priority order. Longer spaced forms come
    /// before the bare characters they contain.
    pub static ref DEFAULT_SEPARATORS: Vec<String> = [
        " / ", " /", "/ ", "/",
        " & ", " &", "& ", "&",
        " AND ",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    pub static ref DEFAULT_SYNONYMS: Vec<SynonymRule> = vec![
        SynonymRule::new(r"\bSURGICAL\b", "SURGERY"),
        SynonymRule::new(r"\bPAEDIATRIC\b", "PEDIATRIC"),
    ];
}

/// One fixed substitution applied by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymRule {
    /// Regular expression, matched case-insensitively against uppercased text
    pub pattern: String,
    pub replacement: String,
}

impl SynonymRule {
    pub fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonConfig {
    /// Replaced by a single space, in list order
    pub separators: Vec<String>,
    pub synonyms: Vec<SynonymRule>,
    /// Labels shorter than this (in characters) skip fuzzy clustering
    pub min_length: usize,
    /// Scores strictly above this (0-100) merge two labels
    pub match_threshold: u8,
    /// Candidates kept per label, self-match excluded
    pub top_k: usize,
}

impl Default for CanonConfig {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.clone(),
            synonyms: DEFAULT_SYNONYMS.clone(),
            min_length: 3,
            match_threshold: 90,
            top_k: 3,
        }
    }
}

impl CanonConfig {
    /// Load a configuration file. Fields missing from the file keep their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CanonError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: CanonConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Degenerate thresholds are accepted (they only under-merge); what is
    /// rejected here would make normalization itself misbehave.
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.separators.iter().find(|s| s.trim().is_empty()) {
            return Err(CanonError::Config(format!(
                "Separator {:?} is blank; separators must contain a non-space character",
                bad
            )));
        }
        if self.match_threshold > 100 {
            tracing::warn!(
                "match_threshold {} is above 100, fuzzy clustering will not merge anything",
                self.match_threshold
            );
        }
        Ok(())
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_match_threshold(mut self, match_threshold: u8) -> Self {
        self.match_threshold = match_threshold;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

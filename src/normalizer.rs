//! Text Normalizer - deterministic per-label cleanup
//!
//! Uppercases, trims, replaces separator substrings with a space and applies
//! the fixed synonym table. The result depends only on the input string and
//! the configuration, never on other rows.

use crate::config::{CanonConfig, SynonymRule};
use crate::error::{CanonError, Result};
use itertools::Itertools;
use regex::{Regex, RegexBuilder};

pub struct TextNormalizer {
    separators: Vec<String>,
    synonyms: Vec<(Regex, String)>,
}

impl TextNormalizer {
    pub fn new(separators: &[String], synonyms: &[SynonymRule]) -> Result<Self> {
        // A blank separator would never stop matching.
        if let Some(bad) = separators.iter().find(|s| s.trim().is_empty()) {
            return Err(CanonError::Config(format!(
                "Separator {:?} is blank; separators must contain a non-space character",
                bad
            )));
        }
        // Matching happens on uppercased text
        let separators = separators.iter().map(|s| s.to_uppercase()).collect();

        let synonyms = synonyms
            .iter()
            .map(|rule| {
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (re, rule.replacement.to_uppercase()))
                    .map_err(|source| CanonError::Pattern {
                        pattern: rule.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { separators, synonyms })
    }

    pub fn from_config(config: &CanonConfig) -> Result<Self> {
        Self::new(&config.separators, &config.synonyms)
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut text = collapse_whitespace(&raw.to_uppercase());

        // Repeat until stable: replacing " AND " in "A AND AND B" leaves a
        // fresh " AND " behind.
        loop {
            let mut replaced = text.clone();
            for separator in &self.separators {
                if replaced.contains(separator.as_str()) {
                    replaced = replaced.replace(separator.as_str(), " ");
                }
            }
            if replaced == text {
                break;
            }
            text = collapse_whitespace(&replaced);
        }

        for (pattern, replacement) in &self.synonyms {
            text = pattern.replace_all(&text, replacement.as_str()).into_owned();
        }

        collapse_whitespace(&text)
    }
}

/// Trim and turn every whitespace run into one space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}

//! Label Map - minor label to major label lookup
//!
//! Shared by the synonym map built from fuzzy clustering and the substring
//! map built by absorption. A label with no entry maps to itself.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMap {
    entries: BTreeMap<String, String>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous major label for `minor`, if any.
    pub fn insert(&mut self, minor: impl Into<String>, major: impl Into<String>) -> Option<String> {
        self.entries.insert(minor.into(), major.into())
    }

    pub fn get(&self, minor: &str) -> Option<&str> {
        self.entries.get(minor).map(String::as_str)
    }

    /// Mapped label, or the label itself when there is no entry.
    pub fn resolve<'a>(&'a self, label: &'a str) -> &'a str {
        self.get(label).unwrap_or(label)
    }

    pub fn contains_key(&self, minor: &str) -> bool {
        self.entries.contains_key(minor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Drop every key that is also some entry's value so no lookup needs a
    /// second hop. Returns the dropped keys in order.
    pub fn remove_chained_keys(&mut self) -> Vec<String> {
        let targets: BTreeSet<String> = self.entries.values().cloned().collect();
        let chained: Vec<String> = self
            .entries
            .keys()
            .filter(|k| targets.contains(*k))
            .cloned()
            .collect();
        for key in &chained {
            self.entries.remove(key);
        }
        chained
    }

    /// Distinct set after rewriting every label through the map.
    pub fn apply<'a, I>(&self, labels: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        labels
            .into_iter()
            .map(|label| self.resolve(label).to_string())
            .collect()
    }
}

impl FromIterator<(String, String)> for LabelMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

//! Substring Absorber
//!
//! Folds a label into the longest label that starts with it when the two are
//! glued together without a word break ("CARDIO" into "CARDIOLOGY"). A label
//! that is only the leading word of a longer one ("CARDIO SURGERY") is left
//! alone.

use crate::label_map::LabelMap;
use std::collections::BTreeSet;
use tracing::{debug, info};

pub fn absorb(distinct: &BTreeSet<String>) -> LabelMap {
    // BTreeSet iteration is already ascending, so every label sharing a
    // prefix with `a` sits in one contiguous run right after it.
    let sorted: Vec<&str> = distinct.iter().map(String::as_str).collect();
    let mut absorbed = LabelMap::new();

    for (i, a) in sorted.iter().enumerate() {
        let mut best: Option<&str> = None;
        for b in &sorted[i + 1..] {
            let Some(rest) = b.strip_prefix(*a) else {
                break;
            };
            if rest.starts_with(' ') {
                continue;
            }
            let longer = best.map_or(true, |current| {
                b.chars().count() > current.chars().count()
            });
            if longer {
                best = Some(*b);
            }
        }
        if let Some(major) = best {
            absorbed.insert(*a, major);
        }
    }

    let chained = absorbed.remove_chained_keys();
    if !chained.is_empty() {
        debug!("Dropped {} chained substring keys: {:?}", chained.len(), chained);
    }

    info!("Substring absorption mapped {} labels", absorbed.len());
    absorbed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(labels: &[&str]) -> BTreeSet<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_word_boundary_is_skipped() {
        let map = absorb(&set_of(&["CARDIO", "CARDIOLOGY", "CARDIO SURGERY"]));
        assert_eq!(map.get("CARDIO"), Some("CARDIOLOGY"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_only_word_prefix_is_not_absorbed() {
        let map = absorb(&set_of(&["CARDIO", "CARDIO SURGERY"]));
        assert!(map.is_empty());
    }

    #[test]
    fn test_longest_absorber_wins() {
        let map = absorb(&set_of(&["NEURO", "NEUROLOGY", "NEUROSURGERY", "NEUROLOGYX"]));
        assert_eq!(map.get("NEURO"), Some("NEUROSURGERY"));
    }

    #[test]
    fn test_equal_length_keeps_first_in_order() {
        let map = absorb(&set_of(&["AB", "ABCD", "ABXY"]));
        assert_eq!(map.get("AB"), Some("ABCD"));
    }

    #[test]
    fn test_suffix_is_not_absorbed() {
        let map = absorb(&set_of(&["ONCOLOGY", "SURGERY ONCOLOGY"]));
        assert!(map.is_empty());
    }

    #[test]
    fn test_glued_prefixes_share_absorber() {
        let map = absorb(&set_of(&["AB", "ABC", "ABCD"]));
        assert_eq!(map.get("AB"), Some("ABCD"));
        assert_eq!(map.get("ABC"), Some("ABCD"));
    }

    #[test]
    fn test_glued_chain_through_word_continuation() {
        // "PEDI X" is glued to "PED" but only a word continuation of "PEDI".
        let map = absorb(&set_of(&["PED", "PEDI", "PEDI X"]));
        assert_eq!(map.get("PED"), Some("PEDI X"));
        assert!(!map.contains_key("PEDI"));
    }

    #[test]
    fn test_no_self_mapping_and_no_chains() {
        let map = absorb(&set_of(&[
            "CARD", "CARDI", "CARDIO", "CARDIOLOGY", "CARDIOLOGY CLINIC", "ORTHO", "ORTHOPEDICS",
        ]));
        let values: BTreeSet<&str> = map.values().collect();
        for (k, v) in map.iter() {
            assert_ne!(k, v);
            assert!(!values.contains(&k));
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(absorb(&BTreeSet::new()).is_empty());
    }
}

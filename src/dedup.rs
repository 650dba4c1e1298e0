//! Token Deduplicator

use itertools::Itertools;

/// Drop repeated whitespace tokens, keeping the first occurrence of each in
/// its original position.
pub fn dedupe(label: &str) -> String {
    label.split_whitespace().unique().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_order() {
        assert_eq!(dedupe("T1 T2 T1 T3"), "T1 T2 T3");
        assert_eq!(dedupe("SURGERY CARDIOLOGY SURGERY"), "SURGERY CARDIOLOGY");
    }

    #[test]
    fn test_whitespace_rejoined() {
        assert_eq!(dedupe("  A   B\tA  "), "A B");
    }

    #[test]
    fn test_empty() {
        assert_eq!(dedupe(""), "");
        assert_eq!(dedupe("   "), "");
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        assert_eq!(dedupe("a A a"), "a A");
    }
}

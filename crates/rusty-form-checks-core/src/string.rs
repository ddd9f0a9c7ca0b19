//! String length and word count

use crate::numeric::{numeric_compare, CompareOp};

/// Number of Unicode scalar values in `value`
pub fn char_length(value: &str) -> usize {
    value.chars().count()
}

/// Compares the character length of `value` against `length`
pub fn length_compare(value: &str, length: usize, op: CompareOp) -> bool {
    numeric_compare(char_length(value), length, op)
}

/// Counts whitespace-separated, non-empty tokens
pub fn word_count(value: &str) -> usize {
    value.split_whitespace().count()
}

/// Compares the word count of `value` against `count`
pub fn word_count_compare(value: &str, count: usize, op: CompareOp) -> bool {
    numeric_compare(word_count(value), count, op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_compare() {
        assert!(length_compare("hello", 3, CompareOp::Ge));
        assert!(!length_compare("hi", 3, CompareOp::Ge));
        assert!(length_compare("hello", 10, CompareOp::Le));
        assert!(!length_compare("verylongstring", 5, CompareOp::Le));
        assert!(length_compare("", 0, CompareOp::Eq));
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        assert_eq!(char_length("héllo"), 5);
        assert!(length_compare("żółw", 4, CompareOp::Eq));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two three"), 3);
        assert_eq!(word_count("  one   two\tthree\n"), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_word_count_compare() {
        assert!(word_count_compare("one two three", 2, CompareOp::Ge));
        assert!(!word_count_compare("one", 2, CompareOp::Ge));
    }
}

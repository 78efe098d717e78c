//! Text feature extraction
//!
//! Turns a text snippet into the three scalar statistics the classifier was
//! trained on.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Canonical feature order used when an artifact does not declare its own
pub const FEATURE_NAMES: [&str; 3] = ["text_length", "num_words", "num_unique_chars"];

/// Statistics derived from a single input text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFeatures {
    /// Number of characters
    pub text_length: usize,
    /// Number of whitespace-delimited tokens
    pub num_words: usize,
    /// Number of distinct characters after lowercasing
    pub num_unique_chars: usize,
}

impl TextFeatures {
    /// Look up a feature by its column name
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "text_length" => Some(self.text_length as f64),
            "num_words" => Some(self.num_words as f64),
            "num_unique_chars" => Some(self.num_unique_chars as f64),
            _ => None,
        }
    }
}

/// Unicode whitespace plus the ASCII information separators U+001C..U+001F,
/// which the training pipeline also splits on
pub fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

pub fn extract_features(text: &str) -> TextFeatures {
    let text_length = text.chars().count();
    let num_words = text
        .split(is_word_separator)
        .filter(|word| !word.is_empty())
        .count();
    // whole-string lowercasing, so context-dependent forms like final sigma match
    let num_unique_chars = text.to_lowercase().chars().collect::<HashSet<_>>().len();

    TextFeatures {
        text_length,
        num_words,
        num_unique_chars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_world() {
        let features = extract_features("Hello world");
        assert_eq!(
            features,
            TextFeatures {
                text_length: 11,
                num_words: 2,
                num_unique_chars: 8,
            }
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let features = extract_features("Привет мир");
        assert_eq!(features.text_length, 10);
        assert_eq!(features.num_words, 2);
    }

    #[test]
    fn test_unique_chars_are_case_insensitive() {
        let features = extract_features("AaA");
        assert_eq!(features.num_unique_chars, 1);
    }

    #[test]
    fn test_words_split_on_any_whitespace() {
        let features = extract_features("  one\ttwo\n\nthree  ");
        assert_eq!(features.num_words, 3);
    }

    #[test]
    fn test_unique_chars_lowercase_whole_string() {
        // "ΣΑΣ" lowercases to "σας": the trailing sigma takes its final form
        assert_eq!(extract_features("ΣΑΣ").num_unique_chars, 3);
    }

    #[test]
    fn test_words_split_on_information_separators() {
        assert_eq!(extract_features("a\u{1c}b").num_words, 2);
        assert_eq!(extract_features("one\u{1f}two three").num_words, 3);
        assert_eq!(extract_features("\u{1c}\u{1d}\u{1e}").num_words, 0);
    }

    #[test]
    fn test_valid_input_has_positive_features() {
        for text in ["abc", "  x  ", "¿Qué tal?", "a\tb", "123"] {
            let features = extract_features(text);
            assert!(features.text_length >= 3, "{text:?}");
            assert!(features.num_words >= 1, "{text:?}");
            assert!(features.num_unique_chars >= 1, "{text:?}");
        }
    }

    #[test]
    fn test_get_by_name() {
        let features = extract_features("Hello world");
        assert_eq!(features.get("text_length"), Some(11.0));
        assert_eq!(features.get("num_words"), Some(2.0));
        assert_eq!(features.get("num_unique_chars"), Some(8.0));
        assert_eq!(features.get("num_vowels"), None);

        for name in FEATURE_NAMES {
            assert!(features.get(name).is_some());
        }
    }
}

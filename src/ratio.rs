use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    dictionary::Dictionary,
    transactions::total_items,
    types::{CompressedTransaction, Transaction},
};

/// Size accounting in item units: every token in a transaction counts one,
/// every dictionary entry counts one for its code plus one per item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionStats {
    pub original_size: usize,
    pub compressed_size: usize,
    pub dictionary_overhead: usize,
    pub total_size: usize,
    /// Percent saved. Negative when the output grew.
    pub ratio: f64,
}

impl CompressionStats {
    pub fn compute(
        original: &[Transaction],
        compressed: &[CompressedTransaction],
        dictionary: &Dictionary,
    ) -> Self {
        let original_size = total_items(original);
        let compressed_size = total_items(compressed);
        let dictionary_overhead = dictionary.overhead();
        let total_size = compressed_size + dictionary_overhead;
        let ratio = if original_size == 0 {
            0.0
        } else {
            (original_size as f64 - total_size as f64) / original_size as f64 * 100.0
        };

        Self {
            original_size,
            compressed_size,
            dictionary_overhead,
            total_size,
            ratio,
        }
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "original size: {}, compressed size: {}, dictionary size: {}, total compressed size: {}, ratio: {:.2}%",
            self.original_size,
            self.compressed_size,
            self.dictionary_overhead,
            self.total_size,
            self.ratio
        )
    }
}

/// Shorthand for [`CompressionStats::compute`]`(..).ratio`.
pub fn compression_ratio(
    original: &[Transaction],
    compressed: &[CompressedTransaction],
    dictionary: &Dictionary,
) -> f64 {
    CompressionStats::compute(original, compressed, dictionary).ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dictionary::DictionaryEntry,
        transactions::parse_line,
    };

    fn lines(lines: &[&str]) -> Vec<Transaction> {
        lines.iter().map(|line| parse_line(line)).collect()
    }

    #[test]
    fn counts_dictionary_overhead() {
        let dictionary = Dictionary::try_from(vec![DictionaryEntry {
            code: "0".to_owned(),
            itemset: vec!["a".to_owned(), "b".to_owned()],
        }])
        .unwrap();
        let original = lines(&["a b c", "a b", "a b d"]);
        let compressed = lines(&["0 c", "0", "0 d"]);

        let stats = CompressionStats::compute(&original, &compressed, &dictionary);
        assert_eq!(stats.original_size, 8);
        assert_eq!(stats.compressed_size, 5);
        assert_eq!(stats.dictionary_overhead, 3);
        assert_eq!(stats.total_size, 8);
        assert_eq!(stats.ratio, 0.0);
    }

    #[test]
    fn expansion_is_negative() {
        let dictionary = Dictionary::try_from(vec![DictionaryEntry {
            code: "0".to_owned(),
            itemset: vec!["a".to_owned(), "b".to_owned()],
        }])
        .unwrap();
        let original = lines(&["a b"]);
        let compressed = lines(&["0"]);

        let stats = CompressionStats::compute(&original, &compressed, &dictionary);
        assert_eq!(stats.total_size, 4);
        assert_eq!(stats.ratio, -100.0);
    }

    #[test]
    fn empty_input_is_zero_percent() {
        let ratio = compression_ratio(&[], &[], &Dictionary::default());
        assert_eq!(ratio, 0.0);
    }

    #[test]
    fn display_has_two_decimals() {
        let stats = CompressionStats::compute(&lines(&["a b c"]), &lines(&["a b"]), &Dictionary::default());
        assert!(stats.to_string().ends_with("ratio: 33.33%"));
    }
}

use std::{path::Path, time::Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    codec::{compress_all, decompress_all},
    config::MiningConfig,
    dictionary::{Dictionary, DictionaryBuilder},
    error::Result,
    itemsets::ItemsetMiner,
    ratio::CompressionStats,
    transactions::{save_transactions, TransactionSet},
    types::{CompressedTransaction, Transaction},
};

/// In-memory result of mining and compressing one batch.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub frequent_itemsets: usize,
    pub dictionary: Dictionary,
    pub compressed: Vec<CompressedTransaction>,
    pub decompressed: Vec<Transaction>,
    pub stats: CompressionStats,
}

impl Outcome {
    /// Whether every decompressed transaction equals its original.
    pub fn is_lossless(&self, original: &TransactionSet) -> bool {
        self.decompressed.as_slice() == original.as_slice()
    }
}

/// What a run reports back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub loaded: usize,
    pub frequent_itemsets: usize,
    pub dictionary_entries: usize,
    pub compressed: usize,
    pub decompressed: usize,
    pub lossless: bool,
    pub stats: CompressionStats,
}

impl RunSummary {
    fn new(original: &TransactionSet, outcome: &Outcome) -> Self {
        Self {
            loaded: original.len(),
            frequent_itemsets: outcome.frequent_itemsets,
            dictionary_entries: outcome.dictionary.len(),
            compressed: outcome.compressed.len(),
            decompressed: outcome.decompressed.len(),
            lossless: outcome.is_lossless(original),
            stats: outcome.stats,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: MiningConfig,
}

impl Pipeline {
    pub fn new(config: MiningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    /// Mines `transactions` and builds its dictionary.
    pub fn build_dictionary(&self, transactions: &TransactionSet) -> Result<(usize, Dictionary)> {
        self.config.validate()?;

        let start = Instant::now();
        let miner = ItemsetMiner::new(self.config.min_support)?.max_len(self.config.max_len)?;
        let mined = miner.mine(transactions);
        let itemsets = mined.frequent_itemsets();
        info!(
            count = itemsets.len(),
            max_level = mined.max_level(),
            elapsed = ?start.elapsed(),
            "frequent itemsets found"
        );

        let start = Instant::now();
        let dictionary = DictionaryBuilder::new()
            .max_entries(self.config.max_entries)
            .code_prefix(self.config.code_prefix.clone())
            .build(&itemsets);
        info!(
            entries = dictionary.len(),
            elapsed = ?start.elapsed(),
            "dictionary created"
        );

        for code in dictionary.colliding_codes(transactions) {
            warn!(code = %code, "generated code is also an input item; decompression will expand it");
        }

        Ok((itemsets.len(), dictionary))
    }

    /// Mines, compresses and decompresses without touching the filesystem.
    pub fn process(&self, transactions: &TransactionSet) -> Result<Outcome> {
        let (frequent_itemsets, dictionary) = self.build_dictionary(transactions)?;
        let compressed = self.compress(transactions, &dictionary);
        let decompressed = self.decompress(&compressed, &dictionary);
        let stats = CompressionStats::compute(transactions.as_slice(), &compressed, &dictionary);
        info!(stats = %stats, "compression ratio calculated");

        let outcome = Outcome {
            frequent_itemsets,
            dictionary,
            compressed,
            decompressed,
            stats,
        };
        let lossless = outcome.is_lossless(transactions);
        if !lossless {
            warn!("decompressed transactions differ from the input");
        }
        info!(lossless, "processing finished");
        Ok(outcome)
    }

    /// File to file run. When `output` is given, the compressed transactions
    /// are written there and read back before decompression and statistics.
    pub fn run(
        &self,
        input: &Path,
        output: Option<&Path>,
        dictionary_out: Option<&Path>,
    ) -> Result<RunSummary> {
        let overall = Instant::now();

        let start = Instant::now();
        let transactions = TransactionSet::load(input)?;
        info!(
            path = %input.display(),
            count = transactions.len(),
            elapsed = ?start.elapsed(),
            "loaded transactions"
        );

        let (frequent_itemsets, dictionary) = self.build_dictionary(&transactions)?;
        let mut compressed = self.compress(&transactions, &dictionary);

        if let Some(output) = output {
            let start = Instant::now();
            save_transactions(output, &compressed)?;
            info!(path = %output.display(), elapsed = ?start.elapsed(), "compressed transactions saved");

            let start = Instant::now();
            compressed = TransactionSet::load(output)?.as_slice().to_vec();
            info!(
                path = %output.display(),
                count = compressed.len(),
                elapsed = ?start.elapsed(),
                "loaded compressed transactions"
            );
        }

        if let Some(path) = dictionary_out {
            dictionary.save(path)?;
            info!(path = %path.display(), "dictionary saved");
        }

        let decompressed = self.decompress(&compressed, &dictionary);
        let stats = CompressionStats::compute(transactions.as_slice(), &compressed, &dictionary);
        info!(stats = %stats, "compression ratio calculated");

        let outcome = Outcome {
            frequent_itemsets,
            dictionary,
            compressed,
            decompressed,
            stats,
        };
        let summary = RunSummary::new(&transactions, &outcome);
        info!(elapsed = ?overall.elapsed(), lossless = summary.lossless, "run finished");
        Ok(summary)
    }

    fn compress(
        &self,
        transactions: &TransactionSet,
        dictionary: &Dictionary,
    ) -> Vec<CompressedTransaction> {
        let start = Instant::now();
        let compressed = compress_all(transactions.as_slice(), dictionary);
        info!(count = compressed.len(), elapsed = ?start.elapsed(), "compressed transactions");
        compressed
    }

    fn decompress(
        &self,
        compressed: &[CompressedTransaction],
        dictionary: &Dictionary,
    ) -> Vec<Transaction> {
        let start = Instant::now();
        let decompressed = decompress_all(compressed, dictionary);
        info!(count = decompressed.len(), elapsed = ?start.elapsed(), "decompressed transactions");
        decompressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    fn transactions(text: &str) -> TransactionSet {
        TransactionSet::from_reader(Cursor::new(text.to_owned())).unwrap()
    }

    #[test]
    fn process_is_lossless() {
        let original = transactions("a b c\na b\na c\nb c\n");
        let outcome = Pipeline::new(MiningConfig::new(0.5))
            .process(&original)
            .unwrap();

        assert_eq!(outcome.frequent_itemsets, 6);
        assert_eq!(outcome.dictionary.len(), 3);
        assert!(outcome.is_lossless(&original));
    }

    #[test]
    fn process_reports_lossy_round_trip() {
        // "0" is both an item and the first generated code
        let original = transactions("0 a b\na b\n0 a b\n");
        let outcome = Pipeline::new(MiningConfig::new(1.0))
            .process(&original)
            .unwrap();
        assert!(!outcome.is_lossless(&original));
    }

    #[test]
    fn whitespace_prefix_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.dat");
        let output = dir.path().join("compressed.dat");
        std::fs::write(&input, "a b c\na b\n").unwrap();

        let err = Pipeline::new(MiningConfig::new(0.5).with_code_prefix("x y"))
            .run(&input, Some(&output), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCodePrefix(_)));
        assert!(!output.exists());
    }

    #[test]
    fn invalid_config_fails_before_mining() {
        let original = transactions("a b\n");
        let err = Pipeline::new(MiningConfig::new(2.0))
            .process(&original)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMinSupport(_)));
    }

    #[test]
    fn run_missing_input() {
        let err = Pipeline::default()
            .run(Path::new("/no/such/input.dat"), None, None)
            .unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}

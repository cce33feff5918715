//! # apriori-compress
//!
//! Lossless transaction compression with a dictionary of frequent itemsets.
//!
//! 1. mine frequent itemsets with a levelwise Apriori search ([`itemsets`])
//! 2. rank the multi-item ones and give each a short base-36 code ([`dictionary`])
//! 3. substitute codes into every transaction, greedily in dictionary order ([`codec`])
//! 4. expand codes back to restore the original transactions
//! 5. report the space saved, dictionary included ([`ratio`])
//!
//! ```
//! use apriori_compress::{compress_transaction, decompress_transaction, DictionaryBuilder};
//! use apriori_compress::{generate_frequent_itemsets, parse_line, TransactionSet};
//!
//! let transactions = TransactionSet::new(
//!     ["a b c", "a b", "a c", "b c"].iter().map(|line| parse_line(line)).collect(),
//! );
//! let mined = generate_frequent_itemsets(&transactions, 0.5, None).unwrap();
//! let dictionary = DictionaryBuilder::new().build(&mined.frequent_itemsets());
//!
//! let compressed = compress_transaction(&parse_line("a b c"), &dictionary);
//! assert_eq!(compressed, parse_line("0 c"));
//! assert_eq!(decompress_transaction(&compressed, &dictionary), parse_line("a b c"));
//! ```

pub mod codec;
pub mod combi;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod inventory;
pub mod itemsets;
pub mod pipeline;
pub mod ratio;
pub mod transactions;
pub mod types;

#[cfg(feature = "python")]
mod wrapper;


pub use codec::{compress_all, compress_transaction, decompress_all, decompress_transaction};
pub use config::MiningConfig;
pub use dictionary::{generate_code, Dictionary, DictionaryBuilder, DictionaryEntry};
pub use error::{Error, Result};
pub use itemsets::{generate_frequent_itemsets, FrequentItemset, ItemsetMiner, MiningResult};
pub use pipeline::{Outcome, Pipeline, RunSummary};
pub use ratio::{compression_ratio, CompressionStats};
pub use transactions::{parse_line, TransactionSet};

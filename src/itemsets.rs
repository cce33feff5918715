//! Levelwise (Apriori) frequent itemset mining.

pub mod count;
pub mod search;

pub use search::{generate_frequent_itemsets, FrequentItemset, ItemsetMiner, MiningResult};

use std::collections::{BTreeSet, HashMap};

/// An opaque item token as read from a transaction line.
pub type Item = String;
/// A compact code standing in for a dictionary itemset.
pub type Code = String;
/// Either an original item or a code, as found in a compressed transaction.
pub type Token = String;

/// Dense id of a frequent item. Ids follow lexicographic token order.
pub type ItemId = usize;
/// Sorted item ids; the canonical form of an itemset inside the miner.
pub type Itemset = Vec<ItemId>;

pub type ItemCounts<'l> = HashMap<&'l str, u32>;
pub type ItemsetCounts = HashMap<Itemset, u32>;

pub type ItemsetLength = usize;
pub type FrequentItemsets = HashMap<ItemsetLength, ItemsetCounts>;

pub type Transaction = BTreeSet<Item>;
pub type CompressedTransaction = BTreeSet<Token>;

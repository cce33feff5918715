use bitvec::prelude::*;
use rayon::prelude::*;
use std::collections::HashMap;

use crate::{
    inventory::Inventory,
    types::{ItemCounts, Itemset, ItemsetCounts, ItemsetLength, Transaction},
};

const APPROX_NUM_UNIQUE_ITEMS: usize = 1024; // arbitrary

/// `count / N >= min_support`, evaluated in floating point the same way for
/// every level.
#[derive(Debug, Clone, Copy)]
pub struct SupportThreshold {
    min_support: f64,
    num_transactions: usize,
}

impl SupportThreshold {
    pub fn new(min_support: f64, num_transactions: usize) -> Self {
        Self {
            min_support,
            num_transactions,
        }
    }

    pub fn support(&self, count: u32) -> f64 {
        if self.num_transactions == 0 {
            0.0
        } else {
            count as f64 / self.num_transactions as f64
        }
    }

    pub fn is_frequent(&self, count: u32) -> bool {
        self.num_transactions > 0 && self.support(count) >= self.min_support
    }
}

/// 1-itemset counts, one per transaction containing the item.
pub fn count_items(transactions: &[Transaction]) -> ItemCounts<'_> {
    let mut item_counts: ItemCounts =
        HashMap::with_capacity(APPROX_NUM_UNIQUE_ITEMS.min(transactions.len() * 4));

    for transaction in transactions {
        for item in transaction {
            *item_counts.entry(item.as_str()).or_insert(0) += 1;
        }
    }

    item_counts
}

/// A transaction reduced to its frequent items, as a bitmap over item ids.
#[derive(Debug, Clone)]
struct Row {
    len: usize,
    bits: BitVec,
}

impl Row {
    fn contains_all(&self, candidate: &[usize]) -> bool {
        candidate.iter().all(|&id| self.bits[id])
    }
}

/// Transactions re-encoded against an [`Inventory`] for fast subset tests.
#[derive(Debug, Clone, Default)]
pub struct TransactionBitmaps {
    rows: Vec<Row>,
}

impl TransactionBitmaps {
    pub fn encode(transactions: &[Transaction], inventory: &Inventory) -> Self {
        let width = inventory.len();
        let rows = transactions
            .par_iter()
            .filter_map(|transaction| {
                let ids = inventory.encode(transaction);
                if ids.is_empty() {
                    return None;
                }
                let mut bits = BitVec::repeat(false, width);
                for &id in &ids {
                    bits.set(id, true);
                }
                Some(Row {
                    len: ids.len(),
                    bits,
                })
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drops rows that cannot contain an itemset of `size` items.
    pub fn retain_min_len(&mut self, size: ItemsetLength) {
        self.rows.retain(|row| row.len >= size);
    }

    /// Counts the rows containing each candidate and keeps the frequent ones.
    pub fn count_frequent(
        &self,
        candidates: Vec<Itemset>,
        threshold: &SupportThreshold,
    ) -> ItemsetCounts {
        candidates
            .into_par_iter()
            .filter_map(|candidate| {
                let candidate_count = self
                    .rows
                    .iter()
                    .filter(|row| row.contains_all(&candidate))
                    .count() as u32;
                if threshold.is_frequent(candidate_count) {
                    Some((candidate, candidate_count))
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::parse_line;
    use maplit::hashmap;

    fn transactions(lines: &[&str]) -> Vec<Transaction> {
        lines.iter().map(|line| parse_line(line)).collect()
    }

    #[test]
    fn threshold_is_inclusive() {
        let threshold = SupportThreshold::new(0.5, 4);
        assert!(threshold.is_frequent(2));
        assert!(!threshold.is_frequent(1));
        assert_eq!(threshold.support(3), 0.75);
    }

    #[test]
    fn threshold_with_no_transactions() {
        let threshold = SupportThreshold::new(0.5, 0);
        assert!(!threshold.is_frequent(0));
        assert_eq!(threshold.support(0), 0.0);
    }

    #[test]
    fn count_items_once_per_transaction() {
        let raw = transactions(&["a b a", "a c", "b"]);
        let counts = count_items(&raw);
        assert_eq!(counts, hashmap! { "a" => 2, "b" => 2, "c" => 1 });
    }

    #[test]
    fn update_counts_with_min_support() {
        let raw = transactions(&["a b", "a c", "a c", "b c"]);
        let inventory = Inventory::from_items(vec!["a", "b", "c"]);
        let bitmaps = TransactionBitmaps::encode(&raw, &inventory);
        let threshold = SupportThreshold::new(0.5, raw.len());

        let counts = bitmaps.count_frequent(
            vec![vec![0, 1], vec![0, 2], vec![1, 2]],
            &threshold,
        );

        assert_eq!(counts, hashmap! { vec![0, 2] => 2 });
    }

    #[test]
    fn encode_drops_rows_without_known_items() {
        let raw = transactions(&["a b", "x y", "", "b"]);
        let inventory = Inventory::from_items(vec!["a", "b"]);
        let mut bitmaps = TransactionBitmaps::encode(&raw, &inventory);
        assert_eq!(bitmaps.len(), 2);

        bitmaps.retain_min_len(2);
        assert_eq!(bitmaps.len(), 1);
    }
}

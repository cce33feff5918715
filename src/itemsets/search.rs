use std::{cmp::Ordering, collections::HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    combi::{join_step, prune_step},
    config::validate_min_support,
    error::{Error, Result},
    inventory::Inventory,
    itemsets::count::{count_items, SupportThreshold, TransactionBitmaps},
    transactions::TransactionSet,
    types::{FrequentItemsets, Item, Itemset, ItemsetCounts, ItemsetLength},
};

/// A frequent itemset decoded back to item tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentItemset {
    /// Sorted, distinct tokens.
    pub items: Vec<Item>,
    pub count: u32,
    pub support: f64,
}

impl FrequentItemset {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Support descending, then sorted tokens ascending. Total.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .support
            .total_cmp(&self.support)
            .then_with(|| self.items.cmp(&other.items))
    }
}

/// Everything the levelwise search found, keyed by itemset length.
#[derive(Debug, Clone, Default)]
pub struct MiningResult {
    pub levels: FrequentItemsets,
    pub inventory: Inventory,
    pub num_transactions: usize,
}

impl MiningResult {
    pub fn len(&self) -> usize {
        self.levels.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_level(&self) -> ItemsetLength {
        self.levels.keys().copied().max().unwrap_or(0)
    }

    pub fn level(&self, size: ItemsetLength) -> Option<&ItemsetCounts> {
        self.levels.get(&size)
    }

    /// All frequent itemsets, in ranking order.
    pub fn frequent_itemsets(&self) -> Vec<FrequentItemset> {
        let n = self.num_transactions as f64;
        let mut itemsets: Vec<FrequentItemset> = self
            .levels
            .values()
            .flat_map(|counts| counts.iter())
            .map(|(itemset, &count)| FrequentItemset {
                items: self.inventory.decode(itemset),
                count,
                support: count as f64 / n,
            })
            .collect();
        itemsets.sort_by(FrequentItemset::rank_cmp);
        itemsets
    }
}

/// Apriori search over a [`TransactionSet`].
#[derive(Debug, Clone, Copy)]
pub struct ItemsetMiner {
    min_support: f64,
    max_len: Option<ItemsetLength>,
}

impl ItemsetMiner {
    pub fn new(min_support: f64) -> Result<Self> {
        validate_min_support(min_support)?;
        Ok(Self {
            min_support,
            max_len: None,
        })
    }

    pub fn max_len(mut self, max_len: Option<ItemsetLength>) -> Result<Self> {
        if max_len == Some(0) {
            return Err(Error::InvalidMaxLen);
        }
        self.max_len = max_len;
        Ok(self)
    }

    pub fn mine(&self, transactions: &TransactionSet) -> MiningResult {
        let num_transactions = transactions.len();
        let threshold = SupportThreshold::new(self.min_support, num_transactions);
        let mut levels: FrequentItemsets = HashMap::new();

        // 1-itemset
        let mut item_counts = count_items(transactions.as_slice());
        item_counts.retain(|_, &mut count| threshold.is_frequent(count));
        let inventory = Inventory::from_items(item_counts.keys().copied());
        debug!(level = 1, kept = inventory.len(), "counted items");

        if inventory.is_empty() {
            return MiningResult {
                levels,
                inventory,
                num_transactions,
            };
        }

        let frequent_1_itemset_counts: ItemsetCounts = item_counts
            .iter()
            .filter_map(|(item, &count)| inventory.id(item).map(|id| (vec![id], count)))
            .collect();
        levels.insert(1, frequent_1_itemset_counts);

        // k-itemset, k >= 2
        let mut bitmaps = TransactionBitmaps::encode(transactions.as_slice(), &inventory);
        let mut size: ItemsetLength = 2;
        while self.max_len.map_or(true, |max_len| size <= max_len) {
            bitmaps.retain_min_len(size);
            if bitmaps.is_empty() {
                break;
            }

            let candidates = generate_candidates_from_prev(&levels[&(size - 1)]);
            let num_candidates = candidates.len();
            if candidates.is_empty() {
                break;
            }

            let frequent = bitmaps.count_frequent(candidates, &threshold);
            debug!(
                level = size,
                candidates = num_candidates,
                kept = frequent.len(),
                "counted candidates"
            );
            if frequent.is_empty() {
                break;
            }

            levels.insert(size, frequent);
            size += 1;
        }

        MiningResult {
            levels,
            inventory,
            num_transactions,
        }
    }
}

/// Joins and prunes the frequent itemsets of the previous level.
pub fn generate_candidates_from_prev(itemset_counts: &ItemsetCounts) -> Vec<Itemset> {
    let prev: Vec<Itemset> = itemset_counts.keys().cloned().collect();
    prune_step(join_step(&prev), itemset_counts)
}

/// Generate frequent itemsets from a list of transactions.
pub fn generate_frequent_itemsets(
    transactions: &TransactionSet,
    min_support: f64,
    max_len: Option<ItemsetLength>,
) -> Result<MiningResult> {
    let miner = ItemsetMiner::new(min_support)?.max_len(max_len)?;
    Ok(miner.mine(transactions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::parse_line;
    use maplit::hashmap;

    const A: &str = "Item A";
    const B: &str = "Item B";
    const C: &str = "Item C";
    const D: &str = "Item D";

    macro_rules! transactions {
        ($([$($x:expr),*]),* $(,)?) => {
            {
                let mut transactions = Vec::new();
                $(transactions.push([$($x.to_owned()),*].into_iter().collect());)*
                TransactionSet::new(transactions)
            }
        };
    }

    fn lines(lines: &[&str]) -> TransactionSet {
        TransactionSet::new(lines.iter().map(|line| parse_line(line)).collect())
    }

    fn as_tokens(result: &MiningResult) -> HashMap<Vec<String>, u32> {
        result
            .levels
            .values()
            .flat_map(|counts| counts.iter())
            .map(|(itemset, &count)| (result.inventory.decode(itemset), count))
            .collect()
    }

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|&x| x.to_owned()).collect()
    }

    #[test]
    fn test_generate_frequent_itemsets_001_minsupport() {
        let transactions = transactions![[A, B], [A, C], [A, B, C], [B, D]];
        let result = generate_frequent_itemsets(&transactions, 0.01, Some(3)).unwrap();

        let expected = hashmap! {
            tokens(&[A]) => 3,
            tokens(&[B]) => 3,
            tokens(&[C]) => 2,
            tokens(&[D]) => 1,
            tokens(&[A, B]) => 2,
            tokens(&[A, C]) => 2,
            tokens(&[B, C]) => 1,
            tokens(&[B, D]) => 1,
            tokens(&[A, B, C]) => 1,
        };

        assert_eq!(as_tokens(&result), expected);
        assert_eq!(result.max_level(), 3);
    }

    #[test]
    fn test_generate_frequent_itemsets_05_minsupport() {
        let transactions = transactions![[A, B], [A, C], [A, B, C], [B, D]];
        let result = generate_frequent_itemsets(&transactions, 0.5, Some(3)).unwrap();

        let expected = hashmap! {
            tokens(&[A]) => 3,
            tokens(&[B]) => 3,
            tokens(&[C]) => 2,
            tokens(&[A, B]) => 2,
            tokens(&[A, C]) => 2,
        };

        assert_eq!(as_tokens(&result), expected);
        assert!(result.level(3).is_none());
    }

    #[test]
    fn test_generate_frequent_itemsets_05_minsupport_unbounded() {
        let transactions = transactions![[A, B], [A, C], [A, B, C], [B, C]];
        let result = generate_frequent_itemsets(&transactions, 0.5, None).unwrap();

        let expected = hashmap! {
            tokens(&[A]) => 3,
            tokens(&[B]) => 3,
            tokens(&[C]) => 3,
            tokens(&[A, B]) => 2,
            tokens(&[A, C]) => 2,
            tokens(&[B, C]) => 2,
        };

        assert_eq!(as_tokens(&result), expected);
        assert_eq!(result.len(), 6);
    }

    #[test]
    fn max_len_stops_early() {
        let transactions = lines(&["a b c", "a b c", "a b"]);
        let result = generate_frequent_itemsets(&transactions, 0.5, Some(2)).unwrap();
        assert_eq!(result.max_level(), 2);

        let result = generate_frequent_itemsets(&transactions, 0.5, None).unwrap();
        assert_eq!(result.max_level(), 3);
        assert_eq!(result.level(3).unwrap()[&vec![0, 1, 2]], 2);
    }

    #[test]
    fn max_len_one_keeps_only_items() {
        let transactions = lines(&["a b", "a b"]);
        let result = generate_frequent_itemsets(&transactions, 1.0, Some(1)).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.level(2).is_none());
    }

    #[test]
    fn empty_transaction_set() {
        let result = generate_frequent_itemsets(&TransactionSet::default(), 0.5, None).unwrap();
        assert!(result.is_empty());
        assert!(result.frequent_itemsets().is_empty());
    }

    #[test]
    fn invalid_parameters() {
        let transactions = lines(&["a"]);
        assert!(matches!(
            generate_frequent_itemsets(&transactions, 0.0, None),
            Err(Error::InvalidMinSupport(_))
        ));
        assert!(matches!(
            generate_frequent_itemsets(&transactions, 1.01, None),
            Err(Error::InvalidMinSupport(_))
        ));
        assert!(matches!(
            generate_frequent_itemsets(&transactions, 0.5, Some(0)),
            Err(Error::InvalidMaxLen)
        ));
    }

    #[test]
    fn frequent_itemsets_are_ranked() {
        let transactions = lines(&["a b c", "a b", "a c", "b c"]);
        let result = generate_frequent_itemsets(&transactions, 0.5, None).unwrap();
        let ranked: Vec<Vec<String>> = result
            .frequent_itemsets()
            .into_iter()
            .map(|itemset| itemset.items)
            .collect();

        assert_eq!(
            ranked,
            vec![
                tokens(&["a"]),
                tokens(&["b"]),
                tokens(&["c"]),
                tokens(&["a", "b"]),
                tokens(&["a", "c"]),
                tokens(&["b", "c"]),
            ]
        );
    }

    #[test]
    fn pruned_candidate_is_never_counted() {
        // {a,b} {a,c} frequent, {b,c} not: {a,b,c} must not appear even though
        // it is present in one transaction
        let transactions = lines(&["a b c", "a b", "a c", "a b", "a c", "d"]);
        let result = generate_frequent_itemsets(&transactions, 0.3, None).unwrap();
        let found = as_tokens(&result);
        assert!(found.contains_key(&tokens(&["a", "b"])));
        assert!(found.contains_key(&tokens(&["a", "c"])));
        assert!(!found.contains_key(&tokens(&["b", "c"])));
        assert!(!found.contains_key(&tokens(&["a", "b", "c"])));
    }
}

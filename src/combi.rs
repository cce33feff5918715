use itertools::Itertools;

use crate::types::{ItemId, Itemset, ItemsetCounts};

/// Joins frequent (k-1)-itemsets into k-candidates.
///
/// Two itemsets are joined when they share their first k-2 items; the
/// candidate is the shared prefix followed by both last items in ascending
/// order. Each candidate is produced once and comes out sorted.
///
/// https://github.com/tommyod/Efficient-Apriori/blob/master/efficient_apriori/itemsets.py
pub fn join_step(itemsets: &[Itemset]) -> Vec<Itemset> {
    let mut itemsets: Vec<&Itemset> = itemsets.iter().filter(|x| !x.is_empty()).collect();
    itemsets.sort_unstable();

    let mut final_itemsets: Vec<Itemset> = Vec::with_capacity(itemsets.len());
    let mut tail_items: Vec<ItemId> = Vec::with_capacity(itemsets.len());

    let mut i = 0;
    while i < itemsets.len() {
        let (&last, first) = match itemsets[i].split_last() {
            Some(split) => split,
            None => {
                i += 1;
                continue;
            }
        };

        tail_items.clear();
        tail_items.push(last);

        let mut skip = 1;
        for other in &itemsets[(i + 1)..] {
            match other.split_last() {
                Some((&other_last, other_first)) if other_first == first => {
                    tail_items.push(other_last);
                    skip += 1;
                }
                _ => break,
            }
        }

        for (&a, &b) in tail_items.iter().tuple_combinations() {
            let mut candidate = Vec::with_capacity(first.len() + 2);
            candidate.extend_from_slice(first);
            candidate.push(a);
            candidate.push(b);
            final_itemsets.push(candidate);
        }

        i += skip;
    }

    final_itemsets
}

/// Drops candidates with an infrequent (k-1)-subset.
pub fn prune_step(candidates: Vec<Itemset>, previous: &ItemsetCounts) -> Vec<Itemset> {
    candidates
        .into_iter()
        .filter(|candidate| {
            candidate.len() < 3
                || candidate
                    .iter()
                    .copied()
                    .combinations(candidate.len() - 1)
                    .all(|subset| previous.contains_key(&subset))
        })
        .collect()
}

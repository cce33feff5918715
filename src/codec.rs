//! Dictionary substitution in both directions.

use rayon::prelude::*;

use crate::{
    dictionary::Dictionary,
    types::{CompressedTransaction, Transaction},
};

/// Greedy single pass over the dictionary in entry order. An entry fires when
/// all of its items are still in the working set; its items are then replaced
/// by its code, which may disable later overlapping entries.
pub fn compress_transaction(
    transaction: &Transaction,
    dictionary: &Dictionary,
) -> CompressedTransaction {
    let mut working: CompressedTransaction = transaction.clone();

    for entry in dictionary {
        if entry.itemset.iter().all(|item| working.contains(item)) {
            for item in &entry.itemset {
                working.remove(item);
            }
            working.insert(entry.code.clone());
        }
    }

    working
}

/// Expands codes back into their items; any other token passes through.
pub fn decompress_transaction(
    compressed: &CompressedTransaction,
    dictionary: &Dictionary,
) -> Transaction {
    let mut transaction = Transaction::new();

    for token in compressed {
        match dictionary.expand(token) {
            Some(items) => transaction.extend(items.iter().cloned()),
            None => {
                transaction.insert(token.clone());
            }
        }
    }

    transaction
}

/// Compresses every transaction, keeping input order.
pub fn compress_all(
    transactions: &[Transaction],
    dictionary: &Dictionary,
) -> Vec<CompressedTransaction> {
    transactions
        .par_iter()
        .map(|transaction| compress_transaction(transaction, dictionary))
        .collect()
}

pub fn decompress_all(
    compressed: &[CompressedTransaction],
    dictionary: &Dictionary,
) -> Vec<Transaction> {
    compressed
        .par_iter()
        .map(|transaction| decompress_transaction(transaction, dictionary))
        .collect()
}

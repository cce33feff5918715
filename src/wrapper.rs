use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::{
    codec::{compress_all, decompress_all},
    config::MiningConfig,
    dictionary::{Dictionary, DictionaryEntry},
    error::Error,
    itemsets::generate_frequent_itemsets,
    pipeline::Pipeline,
    ratio::compression_ratio,
    transactions::TransactionSet,
    types::{Item, Transaction},
};

type PyDictionary = Vec<(String, Vec<Item>)>;

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        match err {
            Error::Read { .. } | Error::Write { .. } | Error::Io(_) => {
                PyIOError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

fn to_transaction_set(transactions: Vec<Vec<Item>>) -> TransactionSet {
    transactions
        .into_iter()
        .map(|items| items.into_iter().collect::<Transaction>())
        .collect::<Vec<_>>()
        .into()
}

fn to_lists(transactions: Vec<Transaction>) -> Vec<Vec<Item>> {
    transactions
        .into_iter()
        .map(|transaction| transaction.into_iter().collect())
        .collect()
}

fn to_py_dictionary(dictionary: &Dictionary) -> PyDictionary {
    dictionary
        .iter()
        .map(|entry| (entry.code.clone(), entry.itemset.clone()))
        .collect()
}

fn from_py_dictionary(dictionary: PyDictionary) -> Result<Dictionary, Error> {
    let entries = dictionary
        .into_iter()
        .map(|(code, itemset)| DictionaryEntry { code, itemset })
        .collect::<Vec<_>>();
    Dictionary::try_from(entries)
}

/// Frequent itemsets as `(items, support)` pairs, best ranked first.
#[pyfunction]
#[pyo3(text_signature = "(transactions, min_support, max_len=None, /)")]
fn mine(
    transactions: Vec<Vec<Item>>,
    min_support: f64,
    max_len: Option<usize>,
) -> PyResult<Vec<(Vec<Item>, f64)>> {
    let transactions = to_transaction_set(transactions);
    let mined = generate_frequent_itemsets(&transactions, min_support, max_len)?;
    Ok(mined
        .frequent_itemsets()
        .into_iter()
        .map(|itemset| (itemset.items, itemset.support))
        .collect())
}

/// Returns `(dictionary, compressed_transactions, ratio)`.
#[pyfunction]
#[pyo3(text_signature = "(transactions, min_support, max_len=None, max_entries=None, /)")]
fn compress_dataset(
    transactions: Vec<Vec<Item>>,
    min_support: f64,
    max_len: Option<usize>,
    max_entries: Option<usize>,
) -> PyResult<(PyDictionary, Vec<Vec<Item>>, f64)> {
    let transactions = to_transaction_set(transactions);
    let config = MiningConfig {
        min_support,
        max_len,
        max_entries,
        ..MiningConfig::default()
    };
    let outcome = Pipeline::new(config).process(&transactions)?;
    Ok((
        to_py_dictionary(&outcome.dictionary),
        to_lists(outcome.compressed),
        outcome.stats.ratio,
    ))
}

#[pyfunction]
#[pyo3(text_signature = "(compressed_transactions, dictionary, /)")]
fn decompress_dataset(
    compressed_transactions: Vec<Vec<Item>>,
    dictionary: PyDictionary,
) -> PyResult<Vec<Vec<Item>>> {
    let dictionary = from_py_dictionary(dictionary)?;
    let compressed = to_transaction_set(compressed_transactions);
    Ok(to_lists(decompress_all(compressed.as_slice(), &dictionary)))
}

#[pyfunction]
#[pyo3(text_signature = "(transactions, dictionary, /)")]
fn compress_with(
    transactions: Vec<Vec<Item>>,
    dictionary: PyDictionary,
) -> PyResult<Vec<Vec<Item>>> {
    let dictionary = from_py_dictionary(dictionary)?;
    let transactions = to_transaction_set(transactions);
    Ok(to_lists(compress_all(transactions.as_slice(), &dictionary)))
}

#[pyfunction]
#[pyo3(text_signature = "(transactions, compressed_transactions, dictionary, /)")]
fn ratio(
    transactions: Vec<Vec<Item>>,
    compressed_transactions: Vec<Vec<Item>>,
    dictionary: PyDictionary,
) -> PyResult<f64> {
    let dictionary = from_py_dictionary(dictionary)?;
    let original = to_transaction_set(transactions);
    let compressed = to_transaction_set(compressed_transactions);
    Ok(compression_ratio(
        original.as_slice(),
        compressed.as_slice(),
        &dictionary,
    ))
}

#[pymodule]
fn apriori_compress(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(mine, m)?)?;
    m.add_function(wrap_pyfunction!(compress_dataset, m)?)?;
    m.add_function(wrap_pyfunction!(compress_with, m)?)?;
    m.add_function(wrap_pyfunction!(decompress_dataset, m)?)?;
    m.add_function(wrap_pyfunction!(ratio, m)?)?;
    Ok(())
}

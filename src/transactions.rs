use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use itertools::Itertools;

use crate::{
    error::{Error, Result},
    types::Transaction,
};

/// An immutable batch of transactions, one per input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionSet {
    transactions: Vec<Transaction>,
}

impl TransactionSet {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Reads whitespace separated tokens, one transaction per line.
    /// Blank lines become empty transactions.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let transactions = reader
            .lines()
            .map(|line| line.map(|line| parse_line(&line)))
            .collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self { transactions })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file)).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Sum of transaction sizes.
    pub fn total_items(&self) -> usize {
        total_items(&self.transactions)
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.transactions
            .iter()
            .any(|transaction| transaction.contains(token))
    }
}

impl From<Vec<Transaction>> for TransactionSet {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self::new(transactions)
    }
}

impl<'a> IntoIterator for &'a TransactionSet {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

pub fn parse_line(line: &str) -> Transaction {
    line.split_ascii_whitespace().map(str::to_owned).collect()
}

pub fn total_items(transactions: &[Transaction]) -> usize {
    transactions.iter().map(|transaction| transaction.len()).sum()
}

/// Writes one line per transaction, tokens joined by a single space.
pub fn write_transactions<'t, W, I>(mut writer: W, transactions: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'t Transaction>,
{
    for transaction in transactions {
        writeln!(writer, "{}", transaction.iter().join(" "))?;
    }
    writer.flush()
}

pub fn save_transactions(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    write_transactions(BufWriter::new(file), transactions).map_err(write_err)
}

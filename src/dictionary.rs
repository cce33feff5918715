//! Ranked itemset → code dictionary.

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    itemsets::FrequentItemset,
    transactions::TransactionSet,
    types::{Code, Item},
};

const CODE_RADIX: usize = 36;

/// Bijective base-36 numeral for `rank`: `0..=9`, `A..=Z`, then `00`, `01`, ...
pub fn generate_code(rank: usize) -> Code {
    let mut digits = Vec::with_capacity(4);
    let mut index = rank;
    loop {
        let digit = (index % CODE_RADIX) as u8;
        digits.push(if digit < 10 {
            b'0' + digit
        } else {
            b'A' + digit - 10
        });
        if index < CODE_RADIX {
            break;
        }
        index = index / CODE_RADIX - 1;
    }
    digits.iter().rev().map(|&d| d as char).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub code: Code,
    /// Sorted, distinct, at least two items.
    pub itemset: Vec<Item>,
}

impl DictionaryEntry {
    /// One unit for the code plus one per item it stands for.
    pub fn overhead(&self) -> usize {
        1 + self.itemset.len()
    }
}

/// Ordered code table. Entry order is substitution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DictionaryEntry>", into = "Vec<DictionaryEntry>")]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
    lookup: HashMap<Code, usize>,
}

impl Dictionary {
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DictionaryEntry> {
        self.entries.iter()
    }

    /// Itemset behind `code`, if it is one.
    pub fn expand(&self, code: &str) -> Option<&[Item]> {
        self.lookup
            .get(code)
            .map(|&index| self.entries[index].itemset.as_slice())
    }

    pub fn overhead(&self) -> usize {
        self.entries.iter().map(DictionaryEntry::overhead).sum()
    }

    /// Codes that are also item tokens in `transactions`. Decompression cannot
    /// tell those apart from real codes.
    pub fn colliding_codes<'a>(&'a self, transactions: &TransactionSet) -> Vec<&'a str> {
        self.entries
            .iter()
            .map(|entry| entry.code.as_str())
            .filter(|code| transactions.contains_token(code))
            .collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dictionary = serde_json::from_reader(BufReader::new(file))?;
        Ok(dictionary)
    }
}

impl TryFrom<Vec<DictionaryEntry>> for Dictionary {
    type Error = Error;

    fn try_from(entries: Vec<DictionaryEntry>) -> Result<Self> {
        let mut lookup = HashMap::with_capacity(entries.len());
        let mut seen: HashSet<Vec<Item>> = HashSet::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            if entry.itemset.len() < 2 {
                return Err(Error::Dictionary(format!(
                    "entry {} has fewer than two items",
                    entry.code
                )));
            }
            let canonical = canonical_items(&entry.itemset);
            if canonical.len() != entry.itemset.len() {
                return Err(Error::Dictionary(format!(
                    "entry {} repeats an item",
                    entry.code
                )));
            }
            if !seen.insert(canonical) {
                return Err(Error::Dictionary(format!(
                    "entry {} duplicates an earlier itemset",
                    entry.code
                )));
            }
            if lookup.insert(entry.code.clone(), index).is_some() {
                return Err(Error::Dictionary(format!(
                    "code {} is assigned twice",
                    entry.code
                )));
            }
        }

        Ok(Self { entries, lookup })
    }
}

/// Sorted, deduplicated copy of `items`.
fn canonical_items(items: &[Item]) -> Vec<Item> {
    let mut canonical = items.to_vec();
    canonical.sort_unstable();
    canonical.dedup();
    canonical
}

impl From<Dictionary> for Vec<DictionaryEntry> {
    fn from(dictionary: Dictionary) -> Self {
        dictionary.entries
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = &'a DictionaryEntry;
    type IntoIter = std::slice::Iter<'a, DictionaryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Ranks mined itemsets and assigns codes.
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    max_entries: Option<usize>,
    code_prefix: String,
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_entries(mut self, max_entries: Option<usize>) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn code_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.code_prefix = prefix.into();
        self
    }

    pub fn build(&self, itemsets: &[FrequentItemset]) -> Dictionary {
        let mut ranked: Vec<&FrequentItemset> = itemsets.iter().collect();
        ranked.sort_by(|a, b| a.rank_cmp(b));

        // after ranking, the first occurrence of an itemset is its best one
        let mut seen: HashSet<Vec<Item>> = HashSet::with_capacity(ranked.len());
        let kept = ranked.into_iter().filter_map(|itemset| {
            let canonical = canonical_items(&itemset.items);
            (canonical.len() >= 2 && seen.insert(canonical.clone())).then(|| canonical)
        });

        let mut lookup = HashMap::new();
        let entries = kept
            .take(self.max_entries.unwrap_or(usize::MAX))
            .enumerate()
            .map(|(rank, itemset)| {
                let code = format!("{}{}", self.code_prefix, generate_code(rank));
                lookup.insert(code.clone(), rank);
                DictionaryEntry { code, itemset }
            })
            .collect();

        Dictionary { entries, lookup }
    }
}

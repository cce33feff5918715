use std::collections::HashMap;

use crate::types::{Item, ItemId, Itemset};

/// Two-way mapping between frequent item tokens and dense ids.
///
/// Ids are handed out in lexicographic token order, so comparing sorted id
/// vectors gives the same result as comparing the sorted token vectors.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    items: Vec<Item>,
    lookup: HashMap<Item, ItemId>,
}

impl Inventory {
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let mut items: Vec<Item> = items.into_iter().map(Into::into).collect();
        items.sort_unstable();
        items.dedup();
        let lookup = items
            .iter()
            .enumerate()
            .map(|(id, item)| (item.clone(), id))
            .collect();
        Self { items, lookup }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn id(&self, item: &str) -> Option<ItemId> {
        self.lookup.get(item).copied()
    }

    pub fn item(&self, id: ItemId) -> Option<&str> {
        self.items.get(id).map(String::as_str)
    }

    /// Maps the known items of a transaction to ids, sorted ascending.
    pub fn encode<'a, I>(&self, items: I) -> Itemset
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut ids: Itemset = items
            .into_iter()
            .filter_map(|item| self.id(item))
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn decode(&self, itemset: &[ItemId]) -> Vec<Item> {
        itemset
            .iter()
            .filter_map(|&id| self.item(id))
            .map(str::to_owned)
            .collect()
    }
}

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::error::StoreError;
use super::item::{rank_at, Item};
use super::query::{paginate, ItemPage, PageRequest};
use super::word_index::WordIndex;

/// Number of items the daemon seeds at startup unless configured otherwise.
pub const DEFAULT_SEED_COUNT: usize = 50;

/// Largest seed count accepted from configuration.
pub const MAX_SEED_COUNT: usize = 100_000;

/// Authoritative in-memory state of the item list.
///
/// Every id in `items` has exactly one rank in `order`, ranks never tie, and
/// `item.selected` is true exactly for the ids in `selected_ids`.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: HashMap<String, Item>,
    order: HashMap<String, i64>,
    word_index: WordIndex,
    selected_ids: HashSet<String>,
}

impl ItemStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `item-1..item-{count}` in creation order, none selected.
    #[must_use]
    pub fn seeded(count: usize) -> Self {
        let mut store = Self::new();
        for n in 1..=count {
            store.add_item(Item::seeded(n));
        }
        debug!(
            items = store.items.len(),
            words = store.word_index.word_count(),
            "Seeded item store"
        );
        store
    }

    /// Build a store from explicit items.
    ///
    /// Ranks come from each item's `order` and selection from its `selected`
    /// flag. Duplicate ids or duplicate ranks are rejected.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        let mut ranks = HashSet::new();
        for item in items {
            if store.items.contains_key(&item.id) {
                return Err(StoreError::validation(format!(
                    "duplicate item id: {}",
                    item.id
                )));
            }
            if !ranks.insert(item.order) {
                return Err(StoreError::validation(format!(
                    "duplicate rank {} for item {}",
                    item.order, item.id
                )));
            }
            store.add_item(item);
        }
        Ok(store)
    }

    fn add_item(&mut self, item: Item) {
        self.order.insert(item.id.clone(), item.order);
        self.word_index.insert(&item.id, &item.label);
        if item.selected {
            self.selected_ids.insert(item.id.clone());
        }
        self.items.insert(item.id.clone(), item);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    #[must_use]
    pub fn rank(&self, id: &str) -> Option<i64> {
        self.order.get(id).copied()
    }

    #[must_use]
    pub fn selected_ids(&self) -> &HashSet<String> {
        &self.selected_ids
    }

    /// True iff every id is known to the store.
    #[must_use]
    pub fn ids_exist(&self, ids: &[String]) -> bool {
        self.first_missing(ids).is_none()
    }

    fn first_missing<'a>(&self, ids: &'a [String]) -> Option<&'a str> {
        ids.iter()
            .map(String::as_str)
            .find(|id| !self.items.contains_key(*id))
    }

    /// Resolve ids to items sorted by ascending rank, ties broken by id.
    fn ranked<'a>(&'a self, ids: impl Iterator<Item = &'a str>) -> Vec<&'a Item> {
        let mut ranked: Vec<(i64, &Item)> = ids
            .filter_map(|id| Some((self.rank(id)?, self.items.get(id)?)))
            .collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
        ranked.into_iter().map(|(_, item)| item).collect()
    }

    /// Page through items in rank order, filtered by `request.search`.
    ///
    /// Every search token must occur as a substring of some word in the
    /// label. A search with no tokens matches everything.
    #[must_use]
    pub fn query(&self, request: &PageRequest) -> ItemPage {
        let filter = request
            .search
            .as_deref()
            .and_then(|search| self.word_index.search(search));
        let candidates = match filter {
            Some(ids) => self.ranked(ids.into_iter()),
            None => self.ranked(self.items.keys().map(String::as_str)),
        };
        paginate(&candidates, request)
    }

    /// Items currently selected, in rank order.
    #[must_use]
    pub fn selected_items(&self) -> Vec<Item> {
        self.ranked(self.selected_ids.iter().map(String::as_str))
            .into_iter()
            .cloned()
            .collect()
    }

    /// Replace the selection with exactly `ids`.
    ///
    /// Duplicates collapse. Fails without changes if any id is unknown.
    pub fn replace_selection(&mut self, ids: &[String]) -> Result<Vec<Item>, StoreError> {
        if let Some(missing) = self.first_missing(ids) {
            return Err(StoreError::not_found(missing));
        }

        let next: HashSet<String> = ids.iter().cloned().collect();
        for item in self.items.values_mut() {
            item.selected = next.contains(&item.id);
        }
        self.selected_ids = next;
        debug!(selected = self.selected_ids.len(), "Replaced selection");

        Ok(self.selected_items())
    }

    /// Move `ids` to the front of the order, in the given order.
    ///
    /// Items not mentioned keep their relative order after them, and the
    /// whole list is renumbered from 0 so ranks stay unique. Returns the
    /// requested items in request order.
    pub fn reorder(&mut self, ids: &[String]) -> Result<Vec<Item>, StoreError> {
        if let Some(duplicate) = find_duplicate(ids) {
            return Err(StoreError::validation(format!(
                "duplicate items in sort order: {duplicate}"
            )));
        }
        if let Some(missing) = self.first_missing(ids) {
            return Err(StoreError::not_found(missing));
        }

        let requested: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let rest: Vec<String> = self
            .ranked(self.items.keys().map(String::as_str))
            .into_iter()
            .filter(|item| !requested.contains(item.id.as_str()))
            .map(|item| item.id.clone())
            .collect();

        for (position, id) in ids.iter().chain(rest.iter()).enumerate() {
            let rank = rank_at(position);
            self.order.insert(id.clone(), rank);
            if let Some(item) = self.items.get_mut(id) {
                item.order = rank;
            }
        }
        debug!(
            moved = ids.len(),
            renumbered = rest.len(),
            "Reordered items"
        );

        Ok(ids
            .iter()
            .filter_map(|id| self.items.get(id).cloned())
            .collect())
    }
}

/// First id that appears more than once.
fn find_duplicate(ids: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .map(String::as_str)
        .find(|id| !seen.insert(*id))
}

#[cfg(test)]
#[path = "item_store_tests.rs"]
mod item_store_tests;

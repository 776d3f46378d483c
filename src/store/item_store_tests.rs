use super::*;
use crate::store::error::ErrorKind;
use serde_json::json;
use std::collections::{BTreeSet, HashSet};

fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| (*id).to_string()).collect()
}

fn page_ids(page: &ItemPage) -> Vec<String> {
    page.items.iter().map(|item| item.id.clone()).collect()
}

fn search_ids(store: &ItemStore, search: &str) -> BTreeSet<String> {
    let request = PageRequest::new(1, store.len().max(1)).with_search(search);
    store
        .query(&request)
        .items
        .into_iter()
        .map(|item| item.id)
        .collect()
}

fn seeded_ids(range: std::ops::RangeInclusive<usize>) -> Vec<String> {
    range.map(|n| format!("item-{n}")).collect()
}

fn fruit_store() -> ItemStore {
    ItemStore::from_items(vec![
        Item::new("a", "Red Apple", json!(1), 0),
        Item::new("b", "Green Apple", json!(2), 1),
        Item::new("c", "Red Cherry", json!(3), 2),
        Item::new("d", "Yellow Banana", json!(4), 3),
    ])
    .unwrap()
}

// ── seeding ───────────────────────────────────────────────────────────────────

#[test]
fn test_seeded_store_shape() {
    let store = ItemStore::seeded(DEFAULT_SEED_COUNT);
    assert_eq!(store.len(), 50);
    assert!(!store.is_empty());
    assert_eq!(store.rank("item-1"), Some(0));
    assert_eq!(store.rank("item-50"), Some(49));
    assert!(store.selected_ids().is_empty());
    assert_eq!(store.get("item-7").unwrap().label, "Item 7");
}

#[test]
fn test_empty_store_query() {
    let store = ItemStore::new();
    assert!(store.is_empty());
    let page = store.query(&PageRequest::default());
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert!(!page.has_more);
}

#[test]
fn test_from_items_rejects_duplicate_ids() {
    let err = ItemStore::from_items(vec![
        Item::new("a", "One", json!(1), 0),
        Item::new("a", "Two", json!(2), 1),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_from_items_rejects_duplicate_ranks() {
    let err = ItemStore::from_items(vec![
        Item::new("a", "One", json!(1), 4),
        Item::new("b", "Two", json!(2), 4),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_from_items_honours_selection_flags() {
    let store = ItemStore::from_items(vec![
        Item::new("a", "One", json!(1), 0).with_selected(true),
        Item::new("b", "Two", json!(2), 1),
    ])
    .unwrap();
    assert_eq!(
        store.selected_ids(),
        &HashSet::from(["a".to_string()])
    );
}

// ── query ─────────────────────────────────────────────────────────────────────

#[test]
fn test_first_page_of_seeded_store() {
    let store = ItemStore::seeded(50);
    let page = store.query(&PageRequest::new(1, 20));
    assert_eq!(page_ids(&page), seeded_ids(1..=20));
    assert_eq!(page.total, 50);
    assert!(page.has_more);
    assert_eq!(page.page, 1);
}

#[test]
fn test_last_page_of_seeded_store() {
    let store = ItemStore::seeded(50);
    let page = store.query(&PageRequest::new(3, 20));
    assert_eq!(page_ids(&page), seeded_ids(41..=50));
    assert_eq!(page.total, 50);
    assert!(!page.has_more);
}

#[test]
fn test_page_beyond_end_is_empty_not_error() {
    let store = ItemStore::seeded(50);
    let page = store.query(&PageRequest::new(4, 20));
    assert!(page.items.is_empty());
    assert_eq!(page.total, 50);
    assert!(!page.has_more);
    assert_eq!(page.page, 4);
}

#[test]
fn test_every_page_matches_slice_of_ordered_list() {
    let store = ItemStore::seeded(23);
    let all = seeded_ids(1..=23);
    for limit in [1_usize, 4, 7, 23, 30] {
        for page in 1..=7_usize {
            let result = store.query(&PageRequest::new(page, limit));
            let start = ((page - 1) * limit).min(all.len());
            let end = (page * limit).min(all.len());
            assert_eq!(page_ids(&result), all[start..end].to_vec());
            assert_eq!(result.has_more, page * limit < all.len());
            assert_eq!(result.total, 23);
        }
    }
}

#[test]
fn test_substring_search_on_label_words() {
    let store = ItemStore::seeded(50);
    for token in ["it", "12", "item", "ITEM"] {
        assert!(
            search_ids(&store, token).contains("item-12"),
            "token {token} should match Item 12"
        );
    }
    assert!(search_ids(&store, "zz").is_empty());
}

#[test]
fn test_search_total_counts_all_matches() {
    let store = ItemStore::seeded(50);
    // 1, 10..19, 21, 31, 41
    let page = store.query(&PageRequest::new(1, 5).with_search("1"));
    assert_eq!(page.total, 14);
    assert_eq!(page.items.len(), 5);
    assert!(page.has_more);
    assert_eq!(
        page_ids(&page),
        strings(&["item-1", "item-10", "item-11", "item-12", "item-13"])
    );
}

#[test]
fn test_multi_word_search_is_intersection() {
    let store = fruit_store();
    let both = search_ids(&store, "red apple");
    let red = search_ids(&store, "red");
    let apple = search_ids(&store, "apple");
    let expected: BTreeSet<String> = red.intersection(&apple).cloned().collect();
    assert_eq!(both, expected);
    assert_eq!(both, BTreeSet::from(["a".to_string()]));
}

#[test]
fn test_intersection_property_on_seeded_store() {
    let store = ItemStore::seeded(50);
    for (a, b) in [("item", "2"), ("1", "3"), ("4", "it"), ("5", "zz")] {
        let combined = search_ids(&store, &format!("{a} {b}"));
        let left = search_ids(&store, a);
        let right = search_ids(&store, b);
        let expected: BTreeSet<String> = left.intersection(&right).cloned().collect();
        assert_eq!(combined, expected, "search '{a} {b}'");
    }
}

#[test]
fn test_blank_search_is_no_filter() {
    let store = ItemStore::seeded(10);
    for search in ["", "   ", "\t\n"] {
        let page = store.query(&PageRequest::new(1, 20).with_search(search));
        assert_eq!(page.total, 10);
    }
}

#[test]
fn test_search_results_follow_rank_not_match_order() {
    let mut store = fruit_store();
    store.reorder(&strings(&["c", "d", "b", "a"])).unwrap();
    let page = store.query(&PageRequest::new(1, 10).with_search("e"));
    // "e" occurs in red, green, cherry, yellow
    assert_eq!(page_ids(&page), strings(&["c", "d", "b", "a"]));
}

#[test]
fn test_query_has_no_side_effects() {
    let store = ItemStore::seeded(10);
    let first = store.query(&PageRequest::new(1, 5).with_search("item"));
    let second = store.query(&PageRequest::new(1, 5).with_search("item"));
    assert_eq!(first, second);
}

// ── selection ─────────────────────────────────────────────────────────────────

#[test]
fn test_replace_selection_sets_flags_and_set() {
    let mut store = ItemStore::seeded(10);
    let selected = store
        .replace_selection(&strings(&["item-3", "item-1"]))
        .unwrap();
    let selected_ids: Vec<&str> = selected.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(selected_ids, vec!["item-1", "item-3"]);
    assert!(selected.iter().all(|item| item.selected));
    assert!(store.get("item-1").unwrap().selected);
    assert!(store.get("item-3").unwrap().selected);
    assert!(!store.get("item-2").unwrap().selected);
    assert_eq!(store.selected_ids().len(), 2);
}

#[test]
fn test_replace_selection_is_full_replace() {
    let mut store = ItemStore::seeded(10);
    store
        .replace_selection(&strings(&["item-1", "item-2", "item-3"]))
        .unwrap();
    store.replace_selection(&strings(&["item-2"])).unwrap();
    assert!(!store.get("item-1").unwrap().selected);
    assert!(store.get("item-2").unwrap().selected);
    assert!(!store.get("item-3").unwrap().selected);
    assert_eq!(store.selected_ids(), &HashSet::from(["item-2".to_string()]));
}

#[test]
fn test_replace_selection_is_idempotent() {
    let mut store = ItemStore::seeded(10);
    let ids = strings(&["item-4", "item-5"]);
    let first = store.replace_selection(&ids).unwrap();
    let second = store.replace_selection(&ids).unwrap();
    assert_eq!(first, second);
    assert_eq!(store.selected_ids().len(), 2);
}

#[test]
fn test_replace_selection_with_empty_clears() {
    let mut store = ItemStore::seeded(10);
    store
        .replace_selection(&strings(&["item-4", "item-5"]))
        .unwrap();
    let selected = store.replace_selection(&[]).unwrap();
    assert!(selected.is_empty());
    assert!(store.selected_ids().is_empty());
    let page = store.query(&PageRequest::new(1, 10));
    assert!(page.items.iter().all(|item| !item.selected));
}

#[test]
fn test_replace_selection_collapses_duplicates() {
    let mut store = ItemStore::seeded(10);
    let selected = store
        .replace_selection(&strings(&["item-2", "item-2", "item-2"]))
        .unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(store.selected_ids().len(), 1);
}

#[test]
fn test_replace_selection_unknown_id_changes_nothing() {
    let mut store = ItemStore::seeded(10);
    store.replace_selection(&strings(&["item-1"])).unwrap();

    let err = store
        .replace_selection(&strings(&["item-2", "nope"]))
        .unwrap_err();
    assert_eq!(err, StoreError::NotFound("nope".to_string()));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(store.selected_ids(), &HashSet::from(["item-1".to_string()]));
    assert!(store.get("item-1").unwrap().selected);
    assert!(!store.get("item-2").unwrap().selected);
}

#[test]
fn test_selection_visible_in_query() {
    let mut store = ItemStore::seeded(5);
    store.replace_selection(&strings(&["item-2"])).unwrap();
    let page = store.query(&PageRequest::new(1, 5));
    let flags: Vec<bool> = page.items.iter().map(|item| item.selected).collect();
    assert_eq!(flags, vec![false, true, false, false, false]);
}

// ── reorder ───────────────────────────────────────────────────────────────────

#[test]
fn test_reorder_full_list_round_trip() {
    let mut store = ItemStore::seeded(50);
    let mut order = seeded_ids(1..=50);
    order.reverse();
    order.swap(3, 17);

    let sorted = store.reorder(&order).unwrap();
    let sorted_ids: Vec<String> = sorted.iter().map(|item| item.id.clone()).collect();
    assert_eq!(sorted_ids, order);

    let page = store.query(&PageRequest::new(1, 50));
    assert_eq!(page_ids(&page), order);
    for (position, item) in page.items.iter().enumerate() {
        assert_eq!(item.order, i64::try_from(position).unwrap());
        assert_eq!(store.rank(&item.id), Some(item.order));
    }
}

#[test]
fn test_reorder_returns_items_in_request_order() {
    let mut store = ItemStore::seeded(10);
    let sorted = store
        .reorder(&strings(&["item-9", "item-2", "item-5"]))
        .unwrap();
    let ids: Vec<&str> = sorted.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["item-9", "item-2", "item-5"]);
}

#[test]
fn test_partial_reorder_keeps_ranks_unique() {
    let mut store = ItemStore::seeded(6);
    store.reorder(&strings(&["item-5", "item-3"])).unwrap();

    let page = store.query(&PageRequest::new(1, 10));
    assert_eq!(
        page_ids(&page),
        strings(&["item-5", "item-3", "item-1", "item-2", "item-4", "item-6"])
    );
    let ranks: HashSet<i64> = page.items.iter().map(|item| item.order).collect();
    assert_eq!(ranks.len(), 6);
}

#[test]
fn test_partial_reorder_preserves_previous_relative_order() {
    let mut store = ItemStore::seeded(5);
    store
        .reorder(&strings(&["item-5", "item-4", "item-3", "item-2", "item-1"]))
        .unwrap();
    store.reorder(&strings(&["item-1"])).unwrap();

    let page = store.query(&PageRequest::new(1, 5));
    assert_eq!(
        page_ids(&page),
        strings(&["item-1", "item-5", "item-4", "item-3", "item-2"])
    );
}

#[test]
fn test_reorder_empty_list_is_noop() {
    let mut store = ItemStore::seeded(5);
    let sorted = store.reorder(&[]).unwrap();
    assert!(sorted.is_empty());
    let page = store.query(&PageRequest::new(1, 5));
    assert_eq!(page_ids(&page), seeded_ids(1..=5));
}

#[test]
fn test_reorder_rejects_duplicates_without_changes() {
    let mut store = ItemStore::seeded(5);
    let err = store
        .reorder(&strings(&["item-2", "item-2"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("duplicate items in sort order"));
    for n in 1..=5_usize {
        assert_eq!(
            store.rank(&format!("item-{n}")),
            Some(i64::try_from(n - 1).unwrap())
        );
    }
}

#[test]
fn test_reorder_duplicate_check_precedes_existence_check() {
    let mut store = ItemStore::seeded(5);
    let err = store
        .reorder(&strings(&["nope", "nope"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_reorder_rejects_unknown_ids_without_changes() {
    let mut store = ItemStore::seeded(5);
    let err = store
        .reorder(&strings(&["item-3", "ghost", "item-1"]))
        .unwrap_err();
    assert_eq!(err, StoreError::NotFound("ghost".to_string()));
    let page = store.query(&PageRequest::new(1, 5));
    assert_eq!(page_ids(&page), seeded_ids(1..=5));
}

#[test]
fn test_reorder_keeps_selection() {
    let mut store = ItemStore::seeded(5);
    store.replace_selection(&strings(&["item-4"])).unwrap();
    let sorted = store.reorder(&strings(&["item-4", "item-1"])).unwrap();
    assert!(sorted.first().unwrap().selected);
    assert_eq!(store.selected_ids().len(), 1);
}

// ── ids_exist ─────────────────────────────────────────────────────────────────

#[test]
fn test_ids_exist() {
    let store = ItemStore::seeded(5);
    assert!(store.ids_exist(&[]));
    assert!(store.ids_exist(&strings(&["item-1", "item-5"])));
    assert!(!store.ids_exist(&strings(&["item-1", "item-6"])));
}

#[test]
fn test_find_duplicate() {
    assert_eq!(find_duplicate(&strings(&["a", "b", "a"])), Some("a"));
    assert_eq!(find_duplicate(&strings(&["a", "b", "c"])), None);
    assert_eq!(find_duplicate(&[]), None);
}

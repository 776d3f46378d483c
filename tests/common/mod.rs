//! Common test utilities

use itemdeck_daemon::{ItemDeckService, ItemStore, ListDefaults, SharedItemStore};

/// Service over a freshly seeded store of `count` items.
#[allow(dead_code)] // Not every integration test uses every helper
pub fn seeded_service(count: usize) -> ItemDeckService {
    ItemDeckService::new(
        SharedItemStore::new(ItemStore::seeded(count)),
        ListDefaults::default(),
    )
}

/// Owned id list from string literals.
pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// `item-{from}..=item-{to}`.
#[allow(dead_code)] // Not every integration test uses every helper
pub fn seeded_ids(from: usize, to: usize) -> Vec<String> {
    (from..=to).map(|n| format!("item-{n}")).collect()
}

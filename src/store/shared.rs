use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::StoreError;
use super::item::Item;
use super::item_store::ItemStore;
use super::query::{ItemPage, PageRequest};

/// Cloneable handle to the process' single [`ItemStore`].
///
/// Reads share the lock; each mutation holds the write lock across its whole
/// validate-then-apply sequence, so no caller sees a half-applied change.
#[derive(Debug, Clone)]
pub struct SharedItemStore {
    inner: Arc<RwLock<ItemStore>>,
}

impl SharedItemStore {
    #[must_use]
    pub fn new(store: ItemStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn query(&self, request: &PageRequest) -> ItemPage {
        self.inner.read().await.query(request)
    }

    pub async fn ids_exist(&self, ids: &[String]) -> bool {
        self.inner.read().await.ids_exist(ids)
    }

    pub async fn replace_selection(&self, ids: &[String]) -> Result<Vec<Item>, StoreError> {
        self.inner.write().await.replace_selection(ids)
    }

    pub async fn reorder(&self, ids: &[String]) -> Result<Vec<Item>, StoreError> {
        self.inner.write().await.reorder(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = SharedItemStore::new(ItemStore::seeded(5));
        let other = store.clone();

        store.replace_selection(&ids(&["item-2"])).await.unwrap();
        let page = other.query(&PageRequest::new(1, 5)).await;
        assert!(page.items.iter().any(|item| item.id == "item-2" && item.selected));
    }

    #[tokio::test]
    async fn test_ids_exist() {
        let store = SharedItemStore::new(ItemStore::seeded(3));
        assert!(store.ids_exist(&ids(&["item-1", "item-3"])).await);
        assert!(!store.ids_exist(&ids(&["item-4"])).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reorders_leave_strict_order() {
        let store = SharedItemStore::new(ItemStore::seeded(20));
        let mut tasks = Vec::new();
        for n in 1..=20_usize {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let request = vec![format!("item-{n}"), format!("item-{}", 21 - n)];
                store.reorder(&request).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let page = store.query(&PageRequest::new(1, 20)).await;
        let mut ranks: Vec<i64> = page.items.iter().map(|item| item.order).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (0..20).collect::<Vec<i64>>());
    }
}

//! In-process item store.
//!
//! Keeps items in insertion order behind an async `RwLock`. Used for local
//! development (`store.backend = "memory"`) and as the store in tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::types::{Item, ItemId, StoreResult, UpdateOutcome};
use crate::store::ItemStore;

/// A thread-safe in-memory collection of items.
#[derive(Clone, Default)]
pub struct MemoryItemStore {
    items: Arc<RwLock<Vec<Item>>>,
}

impl MemoryItemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn insert(&self, name: &str) -> StoreResult<ItemId> {
        let id = ItemId::generate();
        self.items.write().await.push(Item {
            id,
            name: name.to_string(),
        });
        tracing::trace!(item_id = %id, "Inserted item");
        Ok(id)
    }

    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        Ok(self.items.read().await.clone())
    }

    async fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
        Ok(self.items.read().await.iter().find(|item| item.id == id).cloned())
    }

    async fn update_name(&self, id: ItemId, name: &str) -> StoreResult<UpdateOutcome> {
        let mut items = self.items.write().await;
        let outcome = match items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                let modified = item.name != name;
                if modified {
                    item.name = name.to_string();
                }
                UpdateOutcome { matched: true, modified }
            }
            None => UpdateOutcome::default(),
        };
        Ok(outcome)
    }

    async fn delete_by_id(&self, id: ItemId) -> StoreResult<bool> {
        let mut items = self.items.write().await;
        match items.iter().position(|item| item.id == id) {
            Some(index) => {
                items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryItemStore::new();
        let id = store.insert("Test Item").await.unwrap();

        let item = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(item.name, "Test Item");
        assert_eq!(item.id, id);
        assert!(store.find_by_id(ItemId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let store = MemoryItemStore::new();
        assert!(store.find_all().await.unwrap().is_empty());

        store.insert("first").await.unwrap();
        store.insert("second").await.unwrap();
        store.insert("third").await.unwrap();

        let names: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_update_reports_matched_and_modified() {
        let store = MemoryItemStore::new();
        let id = store.insert("before").await.unwrap();

        let outcome = store.update_name(id, "after").await.unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: true, modified: true });

        let unchanged = store.update_name(id, "after").await.unwrap();
        assert_eq!(unchanged, UpdateOutcome { matched: true, modified: false });

        let missing = store.update_name(ItemId::generate(), "x").await.unwrap();
        assert_eq!(missing, UpdateOutcome::default());

        assert_eq!(store.find_by_id(id).await.unwrap().unwrap().name, "after");
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let store = MemoryItemStore::new();
        let id = store.insert("doomed").await.unwrap();

        assert!(store.delete_by_id(id).await.unwrap());
        assert!(!store.delete_by_id(id).await.unwrap());
        assert!(store.is_empty().await);
    }
}

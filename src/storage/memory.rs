use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Storage, StoredItem};
use crate::error::StorageResult;

/// Process-local storage that forgets everything on drop.
///
/// Used for throwaway sessions and in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, StoredItem>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with `(key, value)` pairs.
    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|(k, v)| {
                let item = StoredItem::new(k, v);
                (item.key.clone(), item)
            })
            .collect();
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.read().await.get(key).map(|i| i.value.clone()))
    }

    async fn get_entry(&self, key: &str) -> StorageResult<Option<StoredItem>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items
            .write()
            .await
            .insert(key.to_string(), StoredItem::new(key, value));
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self.items.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("a").await.unwrap(), None);

        storage.set_item("a", "1").await.unwrap();
        storage.set_item("a", "2").await.unwrap();
        assert_eq!(storage.get_item("a").await.unwrap().as_deref(), Some("2"));

        storage.remove_item("a").await.unwrap();
        storage.remove_item("a").await.unwrap();
        assert_eq!(storage.get_item("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_with_items_and_keys() {
        let storage = MemoryStorage::with_items([("b", "x"), ("a", "y")]);
        assert_eq!(storage.keys().await.unwrap(), vec!["a", "b"]);

        let entry = storage.get_entry("b").await.unwrap().unwrap();
        assert_eq!(entry.key, "b");
        assert_eq!(entry.value, "x");
    }
}

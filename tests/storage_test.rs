//! Integration tests for the SQLite storage layer and the query store
//!
//! Tests key/value operations using an in-memory SQLite database, and history
//! persistence across store instances using a database file in a temp dir.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kg_explorer::api::{CausePathParams, FlowQueryParams};
use kg_explorer::config::StorageConfig;
use kg_explorer::error::StorageResult;
use kg_explorer::storage::{
    MemoryStorage, SqliteStorage, Storage, StoredItem, RECENT_CAUSE_QUERIES_KEY,
    RECENT_FLOW_QUERIES_KEY,
};
use kg_explorer::store::{QueryKind, QueryStore};

/// Create an in-memory storage instance for testing
async fn create_test_storage() -> SqliteStorage {
    SqliteStorage::new_in_memory()
        .await
        .expect("Failed to create in-memory storage")
}

/// Storage whose first write stalls, so later writes overtake it
struct SlowFirstWrite {
    inner: MemoryStorage,
    stalled: AtomicBool,
}

impl SlowFirstWrite {
    fn new() -> Self {
        Self {
            inner: MemoryStorage::new(),
            stalled: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Storage for SlowFirstWrite {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key).await
    }

    async fn get_entry(&self, key: &str) -> StorageResult<Option<StoredItem>> {
        self.inner.get_entry(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if !self.stalled.swap(true, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key).await
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        self.inner.keys().await
    }
}

fn file_config(dir: &tempfile::TempDir) -> StorageConfig {
    StorageConfig {
        path: dir.path().join("nested").join("kg.db"),
        max_connections: 2,
    }
}

#[cfg(test)]
mod kv_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_set_and_get_item() {
        let storage = create_test_storage().await;

        storage.set_item("theme", "dark").await.unwrap();
        let value = storage.get_item("theme").await.unwrap();

        assert_eq!(value.as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_get_missing_item() {
        let storage = create_test_storage().await;
        assert!(storage.get_item("nothing").await.unwrap().is_none());
        assert!(storage.get_entry("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_item_overwrites() {
        let storage = create_test_storage().await;

        storage.set_item("k", "one").await.unwrap();
        let first = storage.get_entry("k").await.unwrap().unwrap();
        storage.set_item("k", "two").await.unwrap();
        let second = storage.get_entry("k").await.unwrap().unwrap();

        assert_eq!(second.value, "two");
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(storage.keys().await.unwrap(), vec!["k"]);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let storage = create_test_storage().await;

        storage.set_item("a", "1").await.unwrap();
        storage.set_item("b", "2").await.unwrap();
        storage.remove_item("a").await.unwrap();
        // Removing a missing key is not an error.
        storage.remove_item("a").await.unwrap();

        assert_eq!(storage.keys().await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_file_storage_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);

        let storage = SqliteStorage::new(&config).await.unwrap();
        storage.set_item("k", "v").await.unwrap();

        assert!(config.path.exists());
    }
}

#[cfg(test)]
mod history_persistence_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_history_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);

        {
            let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::new(&config).await.unwrap());
            let store = QueryStore::load(storage).await;
            store.add_flow_query(FlowQueryParams::new("P1", "M1")).await;
            store.add_flow_query(FlowQueryParams::new("P2", "M2")).await;
            store.add_cause_query(CausePathParams::new("屏幕闪烁")).await;
        }

        let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::new(&config).await.unwrap());
        let store = QueryStore::load(storage).await;

        assert_eq!(
            store.recent_flow_queries(),
            vec![FlowQueryParams::new("P2", "M2"), FlowQueryParams::new("P1", "M1")]
        );
        assert_eq!(
            store.recent_cause_queries(),
            vec![CausePathParams::new("屏幕闪烁")]
        );
    }

    #[tokio::test]
    async fn test_history_is_stored_as_json_list() {
        let storage = Arc::new(create_test_storage().await);
        let store = QueryStore::load(storage.clone()).await;

        store.add_flow_query(FlowQueryParams::new("P1", "M1")).await;

        let raw = storage.get_item(RECENT_FLOW_QUERIES_KEY).await.unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, serde_json::json!([{"product": "P1", "module": "M1"}]));
    }

    #[tokio::test]
    async fn test_malformed_history_loads_empty() {
        let storage = Arc::new(create_test_storage().await);
        storage
            .set_item(RECENT_CAUSE_QUERIES_KEY, "{not json")
            .await
            .unwrap();
        storage
            .set_item(
                RECENT_FLOW_QUERIES_KEY,
                r#"[{"product":"P","module":"M"}]"#,
            )
            .await
            .unwrap();

        let store = QueryStore::load(storage).await;

        assert!(store.recent_cause_queries().is_empty());
        assert_eq!(store.recent_flow_queries(), vec![FlowQueryParams::new("P", "M")]);
    }

    #[tokio::test]
    async fn test_oversized_history_is_truncated_on_load() {
        let storage = Arc::new(create_test_storage().await);
        let list: Vec<CausePathParams> = (0..15)
            .map(|i| CausePathParams::new(format!("s{}", i)))
            .collect();
        storage
            .set_item(RECENT_CAUSE_QUERIES_KEY, &serde_json::to_string(&list).unwrap())
            .await
            .unwrap();

        let store = QueryStore::load(storage).await;
        let recent = store.recent_cause_queries();

        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0], CausePathParams::new("s0"));
    }

    #[tokio::test]
    async fn test_clear_history_persists_empty_list() {
        let storage = Arc::new(create_test_storage().await);
        let store = QueryStore::load(storage.clone()).await;

        store.add_cause_query(CausePathParams::new("异响")).await;
        store.clear_history(QueryKind::Cause).await;

        let reloaded = QueryStore::load(storage).await;
        assert!(reloaded.recent_cause_queries().is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_adds_persist_latest_list() {
        let storage = Arc::new(SlowFirstWrite::new());
        let store = QueryStore::load(storage.clone()).await;

        tokio::join!(
            store.add_flow_query(FlowQueryParams::new("P1", "M1")),
            store.add_flow_query(FlowQueryParams::new("P2", "M2")),
        );

        let raw = storage.get_item(RECENT_FLOW_QUERIES_KEY).await.unwrap().unwrap();
        let persisted: Vec<FlowQueryParams> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, store.recent_flow_queries());
        assert_eq!(persisted[0], FlowQueryParams::new("P2", "M2"));

        let reloaded = QueryStore::load(storage).await;
        assert_eq!(reloaded.recent_flow_queries(), store.recent_flow_queries());
    }

    #[tokio::test]
    async fn test_add_overlapping_clear_persists_latest_list() {
        let storage = Arc::new(SlowFirstWrite::new());
        let store = QueryStore::load(storage.clone()).await;

        tokio::join!(
            store.add_cause_query(CausePathParams::new("异响")),
            store.clear_history(QueryKind::Cause),
        );

        let raw = storage.get_item(RECENT_CAUSE_QUERIES_KEY).await.unwrap().unwrap();
        assert_eq!(raw, "[]");
        assert!(store.recent_cause_queries().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_entries_load_once() {
        let storage = Arc::new(create_test_storage().await);
        storage
            .set_item(
                RECENT_CAUSE_QUERIES_KEY,
                r#"[{"symptom":"a"},{"symptom":"b"},{"symptom":"a"}]"#,
            )
            .await
            .unwrap();

        let store = QueryStore::load(storage).await;
        assert_eq!(
            store.recent_cause_queries(),
            vec![CausePathParams::new("a"), CausePathParams::new("b")]
        );
    }
}

//! Durable client-side key/value storage.
//!
//! Holds the query history lists and the bearer token between sessions.
//! Values are opaque strings; callers own the encoding (JSON for history).

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageResult;

/// Storage key for the recent flow query list.
pub const RECENT_FLOW_QUERIES_KEY: &str = "recent_flow_queries";
/// Storage key for the recent cause path query list.
pub const RECENT_CAUSE_QUERIES_KEY: &str = "recent_cause_queries";
/// Storage key for the backend bearer token.
pub const API_TOKEN_KEY: &str = "api_token";

/// A stored value with its last write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    /// Item key.
    pub key: String,
    /// Raw stored value.
    pub value: String,
    /// When the value was last written.
    pub updated_at: DateTime<Utc>,
}

impl StoredItem {
    /// Create an item stamped with the current time.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Key/value storage operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Get the raw value stored under `key`.
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Get the value and its metadata.
    async fn get_entry(&self, key: &str) -> StorageResult<Option<StoredItem>>;
    /// Insert or replace the value under `key`.
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Remove `key`. Missing keys are not an error.
    async fn remove_item(&self, key: &str) -> StorageResult<()>;
    /// All stored keys, sorted.
    async fn keys(&self) -> StorageResult<Vec<String>>;
}

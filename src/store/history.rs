use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::storage::Storage;

/// Maximum number of entries kept per history list.
pub const HISTORY_LIMIT: usize = 10;

/// Move `item` to the front of `list`, dropping any equal entry and
/// everything past `limit`.
pub fn push_front_unique<T: PartialEq>(list: &mut Vec<T>, item: T, limit: usize) {
    if let Some(index) = list.iter().position(|q| *q == item) {
        list.remove(index);
    }
    list.insert(0, item);
    list.truncate(limit);
}

/// Read a persisted history list. Missing, unreadable, or malformed data
/// yields an empty list. Repeated entries keep their first position.
pub async fn load_history<T: DeserializeOwned + PartialEq>(
    storage: &dyn Storage,
    key: &str,
) -> Vec<T> {
    let raw = match storage.get_item(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to read query history");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(list) => {
            let mut unique = Vec::with_capacity(list.len().min(HISTORY_LIMIT));
            for item in list {
                if unique.len() == HISTORY_LIMIT {
                    break;
                }
                if !unique.contains(&item) {
                    unique.push(item);
                }
            }
            unique
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Discarding malformed query history");
            Vec::new()
        }
    }
}

/// Persist a history list. Failures are logged and otherwise ignored.
pub async fn save_history<T: Serialize>(storage: &dyn Storage, key: &str, list: &[T]) {
    let raw = match serde_json::to_string(list) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to encode query history");
            return;
        }
    };

    if let Err(e) = storage.set_item(key, &raw).await {
        warn!(key = %key, error = %e, "Failed to persist query history");
    }
}

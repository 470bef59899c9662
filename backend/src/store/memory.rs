//! In-memory store for tests and single-process development

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Store, StoreEntry, NEW_ENTRY};
use crate::error::{AppError, AppResult};

/// HashMap-backed store with the same versioning semantics as `PgStore`
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<StoreEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value, expected_version: i64) -> AppResult<i64> {
        let mut entries = self.entries.write().await;
        let current = entries.get(key).map(|entry| entry.version).unwrap_or(NEW_ENTRY);
        if current != expected_version {
            return Err(AppError::Conflict {
                resource: key.to_string(),
                message: format!(
                    "Entry was modified concurrently (expected version {}, found {})",
                    expected_version, current
                ),
            });
        }
        let version = current + 1;
        entries.insert(key.to_string(), StoreEntry { value, version });
        Ok(version)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

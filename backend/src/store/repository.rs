//! Typed access to store entries
//!
//! Services read a stage's full entry, fold or mutate in memory, and
//! write the whole entry back at the version they read. Deltas are never
//! written.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use shared::{SubjectKey, TransactionRecord};

use super::{Store, NEW_ENTRY};
use crate::error::{AppError, AppResult};

/// A stage entry decoded from the store: one history per subject, plus
/// the version the entry was read at (passed back on save).
#[derive(Debug)]
pub struct StageHistories<C> {
    pub histories: BTreeMap<SubjectKey, Vec<TransactionRecord<C>>>,
    pub version: i64,
}

impl<C> StageHistories<C> {
    /// The subject's history; empty when the subject has none yet.
    pub fn history(&self, subject: &SubjectKey) -> &[TransactionRecord<C>] {
        self.histories
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn history_mut(&mut self, subject: &SubjectKey) -> &mut Vec<TransactionRecord<C>> {
        self.histories.entry(subject.clone()).or_default()
    }
}

/// Repository over the versioned store
#[derive(Clone)]
pub struct LedgerRepository {
    store: Arc<dyn Store>,
}

impl LedgerRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Decode a whole entry. A missing key decodes as `T::default()` at
    /// version `NEW_ENTRY`.
    pub async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> AppResult<(T, i64)> {
        match self.store.get(key).await? {
            Some(entry) => {
                let value = serde_json::from_value(entry.value).map_err(|err| {
                    AppError::Internal(format!("Corrupt store entry {}: {}", key, err))
                })?;
                Ok((value, entry.version))
            }
            None => Ok((T::default(), NEW_ENTRY)),
        }
    }

    /// Encode and write a whole entry back at the version it was read.
    pub async fn save<T: Serialize>(&self, key: &str, value: &T, version: i64) -> AppResult<i64> {
        let value = serde_json::to_value(value)
            .map_err(|err| AppError::Internal(format!("Encoding store entry {}: {}", key, err)))?;
        self.store.put(key, value, version).await
    }

    /// Load a stage's transaction histories.
    pub async fn load_stage<C: DeserializeOwned>(&self, key: &str) -> AppResult<StageHistories<C>> {
        let (histories, version) = self.load(key).await?;
        Ok(StageHistories { histories, version })
    }

    /// Save a stage's transaction histories.
    pub async fn save_stage<C: Serialize>(
        &self,
        key: &str,
        stage: &StageHistories<C>,
    ) -> AppResult<i64> {
        self.save(key, &stage.histories, stage.version).await
    }
}

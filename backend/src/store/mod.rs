//! Versioned key-value store backing every workflow stage
//!
//! The original console kept one JSON blob per stage key and always
//! rewrote the whole blob. The trait keeps that discipline (get the full
//! entry, put the full entry back) and adds the optimistic version check
//! the console lacked: a put whose expected version is stale fails with
//! `Conflict` instead of silently discarding the other writer's work.

mod memory;
mod postgres;
mod repository;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{LedgerRepository, StageHistories};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppResult;

/// Store keys, one per workflow stage
pub mod keys {
    pub const ORDERS: &str = "orders";
    pub const LABELS_RECEIVED: &str = "label_quantity_received";
    pub const PRODUCTION_FOLLOWUPS: &str = "production_followups";
    pub const INVENTORY_FOLLOWUPS: &str = "inventory_followups";
    pub const BILLS: &str = "bills";
    pub const PAYMENT_DATA: &str = "payment_data";
    pub const DISPATCH_FOLLOWUPS: &str = "dispatch_followups";
    pub const DISPATCH_STATUS: &str = "dispatch_status";
}

/// Expected version for a key that has no entry yet
pub const NEW_ENTRY: i64 = 0;

/// A stored entry and the version it was read at
#[derive(Debug, Clone)]
pub struct StoreEntry {
    pub value: Value,
    pub version: i64,
}

/// Key-value persistence with per-entry optimistic versioning
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the full entry for a key
    async fn get(&self, key: &str) -> AppResult<Option<StoreEntry>>;

    /// Write the full entry back. `expected_version` must be the version
    /// the caller read (`NEW_ENTRY` for a key with no entry yet) or the
    /// write fails with `Conflict`. Returns the new version.
    async fn put(&self, key: &str, value: Value, expected_version: i64) -> AppResult<i64>;

    /// Connectivity probe for health reporting
    async fn ping(&self) -> AppResult<()>;
}

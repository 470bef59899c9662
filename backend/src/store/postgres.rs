//! Postgres-backed store; one JSONB row per stage key

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::{Store, StoreEntry, NEW_ENTRY};
use crate::error::{AppError, AppResult};

/// Store implementation over a `store_entries` table
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get(&self, key: &str) -> AppResult<Option<StoreEntry>> {
        let row = sqlx::query_as::<_, (Value, i64)>(
            "SELECT value, version FROM store_entries WHERE entry_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(value, version)| StoreEntry { value, version }))
    }

    async fn put(&self, key: &str, value: Value, expected_version: i64) -> AppResult<i64> {
        // Single-statement compare-and-swap: the WHERE clause (or the
        // ON CONFLICT guard) loses the race instead of overwriting.
        let rows_affected = if expected_version == NEW_ENTRY {
            sqlx::query(
                r#"
                INSERT INTO store_entries (entry_key, value, version)
                VALUES ($1, $2, 1)
                ON CONFLICT (entry_key) DO NOTHING
                "#,
            )
            .bind(key)
            .bind(&value)
            .execute(&self.db)
            .await?
            .rows_affected()
        } else {
            sqlx::query(
                r#"
                UPDATE store_entries
                SET value = $2, version = version + 1, updated_at = now()
                WHERE entry_key = $1 AND version = $3
                "#,
            )
            .bind(key)
            .bind(&value)
            .bind(expected_version)
            .execute(&self.db)
            .await?
            .rows_affected()
        };

        if rows_affected == 0 {
            return Err(AppError::Conflict {
                resource: key.to_string(),
                message: format!(
                    "Entry was modified concurrently (expected version {})",
                    expected_version
                ),
            });
        }

        Ok(expected_version + 1)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

//! SQLite Key-Value Store
//!
//! One table holds both scopes, keyed by `(scope, key)`. Values are stored
//! as JSON text.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::traits::{KeyValueStore, StoreScope};
use crate::domain::{DomainError, DomainResult};

pub struct SqliteStore {
    conn: Arc<Mutex<Option<Connection>>>,
    scope: StoreScope,
}

impl SqliteStore {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>, scope: StoreScope) -> Self {
        Self { conn, scope }
    }

    /// Keys in this scope, sorted
    pub async fn keys(&self) -> DomainResult<Vec<String>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(not_initialized())?;

        let mut stmt = conn.prepare("SELECT key FROM kv_store WHERE scope = ? ORDER BY key")?;
        let mut rows = stmt.query(params![self.scope.as_str()])?;

        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}

fn not_initialized() -> DomainError {
    DomainError::Storage("Database not initialized".to_string())
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    fn scope(&self) -> StoreScope {
        self.scope
    }

    async fn get(&self, key: &str) -> DomainResult<Option<Value>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(not_initialized())?;

        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM kv_store WHERE scope = ? AND key = ?",
                params![self.scope.as_str(), key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| DomainError::Storage(format!("Corrupt value for '{}': {}", key, e))),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> DomainResult<()> {
        let text = serde_json::to_string(&value)?;
        let now = chrono::Utc::now().timestamp_millis();

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(not_initialized())?;

        conn.execute(
            "INSERT INTO kv_store (scope, key, value, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(scope, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![self.scope.as_str(), key, text, now],
        )?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(not_initialized())?;

        conn.execute(
            "DELETE FROM kv_store WHERE scope = ? AND key = ?",
            params![self.scope.as_str(), key],
        )?;
        Ok(())
    }
}

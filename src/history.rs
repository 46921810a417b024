//! Launch History
//!
//! Append-only list of launched IDEs in the local store, trimmed periodically.

use std::sync::Arc;

use crate::domain::{DomainResult, HistoryEntry};
use crate::repository::{keys, load_json, save_json, KeyValueStore};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

pub struct HistoryLog {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
}

impl HistoryLog {
    pub fn new(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    pub async fn list(&self) -> DomainResult<Vec<HistoryEntry>> {
        Ok(load_json(self.store.as_ref(), keys::HISTORY).await?.unwrap_or_default())
    }

    pub async fn add(&self, entry: HistoryEntry) -> DomainResult<()> {
        let mut history = self.list().await?;
        history.push(entry);
        save_json(self.store.as_ref(), keys::HISTORY, &history).await
    }

    /// Keep only the newest `limit` entries. Returns how many were dropped.
    pub async fn cleanup(&self) -> DomainResult<usize> {
        let history = self.list().await?;
        if history.len() <= self.limit {
            return Ok(0);
        }

        let dropped = history.len() - self.limit;
        save_json(self.store.as_ref(), keys::HISTORY, &history[dropped..]).await?;
        log::info!("History cleanup dropped {} entries", dropped);
        Ok(dropped)
    }

    pub async fn clear(&self) -> DomainResult<()> {
        save_json(self.store.as_ref(), keys::HISTORY, &Vec::<HistoryEntry>::new()).await
    }
}

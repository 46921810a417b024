//! In-memory Key-Value Store
//!
//! Used when persistence is disabled and as a test double.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::traits::{KeyValueStore, StoreScope};
use crate::domain::DomainResult;

pub struct MemoryStore {
    scope: StoreScope,
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new(scope: StoreScope) -> Self {
        Self {
            scope,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn scope(&self) -> StoreScope {
        self.scope
    }

    async fn get(&self, key: &str) -> DomainResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> DomainResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

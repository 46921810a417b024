//! Repository Layer - Core Traits
//!
//! Defines the key-value store the worker persists through. The extension
//! host offers two instances: a local store scoped to this device and a
//! synced store propagated across the user's devices.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainResult;

/// Well-known keys
pub mod keys {
    pub const WORKSPACES: &str = "workspaces";
    pub const IDES: &str = "ides";
    pub const CUSTOM_IDES: &str = "customIdes";
    pub const HISTORY: &str = "history";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreScope {
    Local,
    Sync,
}

impl StoreScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreScope::Local => "local",
            StoreScope::Sync => "sync",
        }
    }
}

/// Asynchronous get/set by key. No transactions; a single `set` either
/// replaces the whole value or leaves the previous one in place.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    fn scope(&self) -> StoreScope;

    /// `None` when the key is absent
    async fn get(&self, key: &str) -> DomainResult<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> DomainResult<()>;

    async fn remove(&self, key: &str) -> DomainResult<()>;
}

/// Read and deserialize a value
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> DomainResult<Option<T>> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serialize and write a value
pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> DomainResult<()> {
    store.set(key, serde_json::to_value(value)?).await
}

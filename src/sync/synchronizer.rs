//! Workspace Synchronizer
//!
//! Owns the in-memory workspace view and reconciles it with the synced
//! store. `synchronize()` and `save()` are the only mutators, and both run
//! under a single-flight guard so overlapping calls queue instead of
//! interleaving between store reads and writes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::clock::{Clock, SystemClock};
use super::index::WorkspaceIndex;
use super::merge::merge_workspaces;
use crate::domain::{DomainError, DomainResult, Notification, PageDescriptor, Workspace};
use crate::notify::NotificationSink;
use crate::repository::{keys, KeyValueStore};

/// Result of one synchronization, as returned to UI callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncReport {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(error: &DomainError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub workspace: Workspace,
    #[serde(flatten)]
    pub sync: SyncReport,
}

pub struct WorkspaceSynchronizer {
    remote: Arc<dyn KeyValueStore>,
    cache: Option<Arc<dyn KeyValueStore>>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    index: RwLock<WorkspaceIndex>,
    in_flight: Mutex<()>,
}

impl WorkspaceSynchronizer {
    pub fn new(remote: Arc<dyn KeyValueStore>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            remote,
            cache: None,
            notifier,
            clock: Arc::new(SystemClock),
            index: RwLock::new(WorkspaceIndex::new()),
            in_flight: Mutex::new(()),
        }
    }

    /// Also mirror the merged collection into the device-local store
    pub fn with_cache(mut self, cache: Arc<dyn KeyValueStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current in-memory collection, in index order
    pub async fn workspaces(&self) -> Vec<Workspace> {
        self.index.read().await.to_vec()
    }

    pub async fn get(&self, id: &str) -> Option<Workspace> {
        self.index.read().await.get(id).cloned()
    }

    /// Load the device-local copy into memory. Returns the resulting count.
    pub async fn restore(&self) -> DomainResult<usize> {
        let Some(cache) = &self.cache else {
            return Ok(self.index.read().await.len());
        };

        let _flight = self.in_flight.lock().await;
        let cached = decode_collection(cache.get(keys::WORKSPACES).await?)?;

        let mut index = self.index.write().await;
        let merged = merge_workspaces(&index.to_vec(), &cached);
        *index = WorkspaceIndex::from(merged);
        log::info!("Restored {} workspaces from local store", index.len());
        Ok(index.len())
    }

    /// Reconcile with the synced store; failures are reported, never raised
    pub async fn synchronize(&self) -> SyncReport {
        match self.try_synchronize().await {
            Ok(_) => SyncReport::ok(),
            Err(e) => SyncReport::failed(&e),
        }
    }

    /// Like `synchronize`, returning the merged count or the failure
    pub async fn try_synchronize(&self) -> DomainResult<usize> {
        let _flight = self.in_flight.lock().await;
        self.sync_locked().await
    }

    /// Save `page` as a new workspace, then propagate it.
    ///
    /// The record stays in memory even if propagation fails, so the next
    /// periodic sync pushes it.
    pub async fn save(&self, page: &PageDescriptor) -> DomainResult<SaveOutcome> {
        if page.url.trim().is_empty() {
            return Err(DomainError::InvalidInput("page has no url".to_string()));
        }

        let _flight = self.in_flight.lock().await;

        let workspace = Workspace::from_page(
            uuid::Uuid::new_v4().to_string(),
            page,
            self.clock.now_millis(),
        );
        self.index.write().await.upsert(workspace.clone());
        log::info!("Saved workspace {} ({})", workspace.id, workspace.url);

        let sync = match self.sync_locked().await {
            Ok(_) => {
                self.notifier.notify(Notification::workspace_saved(&workspace.title));
                SyncReport::ok()
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::workspace_sync_failed(&workspace.title, &e.to_string()));
                SyncReport::failed(&e)
            }
        };

        Ok(SaveOutcome { workspace, sync })
    }

    /// Caller must hold `in_flight`
    async fn sync_locked(&self) -> DomainResult<usize> {
        let remote = match self.remote.get(keys::WORKSPACES).await {
            Ok(value) => decode_collection(value)?,
            Err(e) => {
                log::error!("Workspace sync failed reading synced store: {}", e);
                return Err(e);
            }
        };
        let local = self.index.read().await.to_vec();

        let merged = merge_workspaces(&local, &remote);
        log::debug!(
            "Merged {} local and {} remote workspaces into {}",
            local.len(),
            remote.len(),
            merged.len()
        );

        let payload = serde_json::to_value(&merged)?;
        if let Err(e) = self.remote.set(keys::WORKSPACES, payload.clone()).await {
            log::error!("Workspace sync failed writing synced store: {}", e);
            return Err(e);
        }

        let count = merged.len();
        *self.index.write().await = WorkspaceIndex::from(merged);

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(keys::WORKSPACES, payload).await {
                log::warn!("Failed to mirror workspaces to local store: {}", e);
            }
        }

        log::info!("Workspace sync complete: {} workspaces", count);
        Ok(count)
    }
}

/// Decode a stored collection. Absent or null means empty; records without
/// an id are skipped.
fn decode_collection(value: Option<Value>) -> DomainResult<Vec<Workspace>> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(DomainError::InvalidInput(format!(
                "stored workspaces is not a list (found {})",
                json_kind(&other)
            )))
        }
    };

    let mut workspaces = Vec::with_capacity(items.len());
    for item in &items {
        match Workspace::from_value(item) {
            Ok(ws) => workspaces.push(ws),
            Err(e) => log::warn!("Skipping stored workspace: {}", e),
        }
    }
    Ok(workspaces)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationKind;
    use crate::notify::RecordingNotifier;
    use crate::repository::tests::FlakyStore;
    use crate::repository::{MemoryStore, StoreScope};
    use serde_json::json;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct FixedClock(AtomicI64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn ws(id: &str, last_modified: i64) -> Workspace {
        Workspace {
            id: id.to_string(),
            title: format!("ws {}", id),
            url: format!("https://github.dev/{}", id),
            favicon: None,
            created: last_modified,
            last_modified: Some(last_modified),
        }
    }

    fn page(title: &str) -> PageDescriptor {
        PageDescriptor {
            title: title.to_string(),
            url: "https://vscode.dev/github/user/repo".to_string(),
            fav_icon_url: None,
        }
    }

    async fn seed_local(sync: &WorkspaceSynchronizer, list: Vec<Workspace>) {
        let mut index = sync.index.write().await;
        for w in list {
            index.upsert(w);
        }
    }

    async fn stored(store: &dyn KeyValueStore) -> Vec<Workspace> {
        decode_collection(store.get(keys::WORKSPACES).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_remote_receives_local_collection() {
        let remote = Arc::new(MemoryStore::new(StoreScope::Sync));
        let sync = WorkspaceSynchronizer::new(remote.clone(), Arc::new(RecordingNotifier::default()));
        seed_local(&sync, vec![ws("1", 100), ws("2", 200)]).await;

        let report = sync.synchronize().await;
        assert_eq!(report, SyncReport::ok());
        assert_eq!(stored(remote.as_ref()).await, vec![ws("1", 100), ws("2", 200)]);
    }

    #[tokio::test]
    async fn test_merge_scenario_updates_both_sides() {
        let remote = Arc::new(MemoryStore::new(StoreScope::Sync));
        remote
            .set(keys::WORKSPACES, serde_json::to_value(vec![ws("2", 100), ws("3", 300)]).unwrap())
            .await
            .unwrap();
        let sync = WorkspaceSynchronizer::new(remote.clone(), Arc::new(RecordingNotifier::default()));
        seed_local(&sync, vec![ws("1", 100), ws("2", 200)]).await;

        assert_eq!(sync.try_synchronize().await.unwrap(), 3);

        let in_memory = sync.workspaces().await;
        assert_eq!(in_memory.len(), 3);
        assert_eq!(sync.get("2").await.unwrap().last_modified, Some(200));
        assert_eq!(stored(remote.as_ref()).await, in_memory);
    }

    #[tokio::test]
    async fn test_read_failure_leaves_state_unchanged() {
        let remote = FlakyStore::new(StoreScope::Sync);
        remote
            .inner
            .set(keys::WORKSPACES, serde_json::to_value(vec![ws("9", 900)]).unwrap())
            .await
            .unwrap();
        remote.fail_reads.store(true, Ordering::SeqCst);

        let sync = WorkspaceSynchronizer::new(remote.clone(), Arc::new(RecordingNotifier::default()));
        seed_local(&sync, vec![ws("1", 100)]).await;

        let report = sync.synchronize().await;
        assert!(!report.success);
        assert!(report.error.unwrap().contains("read quota"));
        assert_eq!(sync.workspaces().await, vec![ws("1", 100)]);
        assert_eq!(remote.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_write_failure_leaves_state_unchanged() {
        let remote = FlakyStore::new(StoreScope::Sync);
        remote
            .inner
            .set(keys::WORKSPACES, serde_json::to_value(vec![ws("9", 900)]).unwrap())
            .await
            .unwrap();
        remote.fail_writes.store(true, Ordering::SeqCst);

        let sync = WorkspaceSynchronizer::new(remote.clone(), Arc::new(RecordingNotifier::default()));
        seed_local(&sync, vec![ws("1", 100)]).await;

        assert!(sync.try_synchronize().await.is_err());
        assert_eq!(sync.workspaces().await, vec![ws("1", 100)]);
        assert_eq!(stored(&remote.inner).await, vec![ws("9", 900)]);
    }

    #[tokio::test]
    async fn test_malformed_remote_records() {
        let remote = Arc::new(MemoryStore::new(StoreScope::Sync));
        remote
            .set(
                keys::WORKSPACES,
                json!([
                    {"title": "no id", "lastModified": 999},
                    {"id": "1", "title": "undated remote"},
                    {"id": "2", "title": "remote", "lastModified": 50},
                ]),
            )
            .await
            .unwrap();
        let sync = WorkspaceSynchronizer::new(remote.clone(), Arc::new(RecordingNotifier::default()));
        seed_local(&sync, vec![ws("1", 0)]).await;

        sync.try_synchronize().await.unwrap();
        let merged = sync.workspaces().await;
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], ws("1", 0));
        assert_eq!(merged[1].title, "remote");
    }

    #[tokio::test]
    async fn test_non_list_remote_fails_without_overwrite() {
        let remote = Arc::new(MemoryStore::new(StoreScope::Sync));
        remote.set(keys::WORKSPACES, json!({"oops": true})).await.unwrap();
        let sync = WorkspaceSynchronizer::new(remote.clone(), Arc::new(RecordingNotifier::default()));
        seed_local(&sync, vec![ws("1", 1)]).await;

        let report = sync.synchronize().await;
        assert!(!report.success);
        assert_eq!(remote.get(keys::WORKSPACES).await.unwrap(), Some(json!({"oops": true})));
    }

    #[tokio::test]
    async fn test_save_creates_record_and_notifies() {
        let remote = Arc::new(MemoryStore::new(StoreScope::Sync));
        let notifier = Arc::new(RecordingNotifier::default());
        let sync = WorkspaceSynchronizer::new(remote.clone(), notifier.clone())
            .with_clock(Arc::new(FixedClock(AtomicI64::new(1_700_000_000_000))));

        let outcome = sync.save(&page("Test IDE")).await.unwrap();
        assert!(outcome.sync.success);
        assert_eq!(outcome.workspace.created, 1_700_000_000_000);
        assert_eq!(outcome.workspace.last_modified, Some(1_700_000_000_000));
        assert!(!outcome.workspace.id.is_empty());

        assert_eq!(stored(remote.as_ref()).await, vec![outcome.workspace.clone()]);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::WorkspaceSaved);
        assert_eq!(sent[0].message, "\"Test IDE\" has been saved");
    }

    #[tokio::test]
    async fn test_save_with_failed_sync_keeps_record_locally() {
        let remote = FlakyStore::new(StoreScope::Sync);
        remote.fail_writes.store(true, Ordering::SeqCst);
        let notifier = Arc::new(RecordingNotifier::default());
        let sync = WorkspaceSynchronizer::new(remote.clone(), notifier.clone());

        let outcome = sync.save(&page("Offline")).await.unwrap();
        assert!(!outcome.sync.success);
        assert_eq!(sync.workspaces().await, vec![outcome.workspace.clone()]);
        assert_eq!(notifier.sent()[0].kind, NotificationKind::WorkspaceSyncFailed);

        remote.fail_writes.store(false, Ordering::SeqCst);
        assert!(sync.synchronize().await.success);
        assert_eq!(stored(&remote.inner).await, vec![outcome.workspace]);
    }

    #[tokio::test]
    async fn test_save_rejects_empty_url() {
        let sync = WorkspaceSynchronizer::new(
            Arc::new(MemoryStore::new(StoreScope::Sync)),
            Arc::new(RecordingNotifier::default()),
        );
        let mut empty = page("x");
        empty.url = "  ".to_string();
        assert!(matches!(sync.save(&empty).await, Err(DomainError::InvalidInput(_))));
        assert!(sync.workspaces().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_saves_are_all_kept() {
        let remote = Arc::new(MemoryStore::new(StoreScope::Sync));
        let sync = Arc::new(WorkspaceSynchronizer::new(
            remote.clone(),
            Arc::new(RecordingNotifier::default()),
        ));

        let mut handles = Vec::new();
        for i in 0..8 {
            let sync = sync.clone();
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    sync.save(&page(&format!("page {}", i))).await.map(|_| ())
                } else {
                    sync.try_synchronize().await.map(|_| ())
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(sync.workspaces().await.len(), 4);
        assert_eq!(stored(remote.as_ref()).await.len(), 4);
    }

    #[tokio::test]
    async fn test_cache_mirror_and_restore() {
        let remote = Arc::new(MemoryStore::new(StoreScope::Sync));
        let cache = Arc::new(MemoryStore::new(StoreScope::Local));

        let first = WorkspaceSynchronizer::new(remote.clone(), Arc::new(RecordingNotifier::default()))
            .with_cache(cache.clone());
        let saved = first.save(&page("Kept")).await.unwrap().workspace;

        let second = WorkspaceSynchronizer::new(remote.clone(), Arc::new(RecordingNotifier::default()))
            .with_cache(cache.clone());
        assert_eq!(second.restore().await.unwrap(), 1);
        assert_eq!(second.get(&saved.id).await, Some(saved));
    }
}

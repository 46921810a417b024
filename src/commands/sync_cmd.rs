//! Workspace Sync Commands

use crate::domain::{PageDescriptor, Workspace};
use crate::sync::{SaveOutcome, SyncReport};
use crate::AppState;

/// Reconcile the in-memory workspaces with the synced store
pub async fn sync_workspaces(state: &AppState) -> SyncReport {
    state.synchronizer.synchronize().await
}

/// Save the given page as a workspace and propagate it
pub async fn save_workspace(state: &AppState, tab: PageDescriptor) -> Result<SaveOutcome, String> {
    state.synchronizer.save(&tab).await.map_err(|e| e.to_string())
}

pub async fn list_workspaces(state: &AppState) -> Vec<Workspace> {
    state.synchronizer.workspaces().await
}

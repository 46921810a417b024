//! History and Catalog Commands

use crate::domain::{HistoryEntry, IdeEntry};
use crate::AppState;

pub async fn add_to_history(state: &AppState, entry: HistoryEntry) -> Result<(), String> {
    state.history.add(entry).await.map_err(|e| e.to_string())
}

pub async fn clear_history(state: &AppState) -> Result<(), String> {
    state.history.clear().await.map_err(|e| e.to_string())
}

/// Trim history to the configured limit (cleanup alarm)
pub async fn cleanup_history(state: &AppState) -> Result<usize, String> {
    state.history.cleanup().await.map_err(|e| e.to_string())
}

pub async fn search_ides(state: &AppState, query: &str) -> Result<Vec<IdeEntry>, String> {
    state.catalog.search(query).await.map_err(|e| e.to_string())
}

//! IDE Status Commands

use std::collections::HashMap;

use crate::AppState;

pub async fn check_ide_status(state: &AppState, url: &str) -> bool {
    state.statuses.check(url).await
}

/// Last known status per IDE url
pub async fn get_ide_statuses(state: &AppState) -> HashMap<String, bool> {
    state.statuses.statuses().await
}

/// Probe every stored IDE (status alarm)
pub async fn check_ide_statuses(state: &AppState) -> Result<HashMap<String, bool>, String> {
    state.statuses.check_all().await.map_err(|e| e.to_string())
}
